//! HTTP gateway (Axum) for predictions and diversity picks.
//!
//! This module is primarily used by the `ff1000` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    more_like_this_handler, predict_handler, scores_handler, something_else_handler,
};
pub use state::HandlerState;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict/{model}", post(predict_handler))
        .route("/scores/{model}", post(scores_handler))
        .route("/something-else", post(something_else_handler))
        .route("/more-like-this", post(more_like_this_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
