use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use ff1000::constants::DEFAULT_PREDICT_LIMIT;
use ff1000::context::Model;
use ff1000::diversity::{DiversityPick, DiversityRequest};
use ff1000::ranking::{Prediction, ScoreExport};

pub const DEFAULT_RELATED_LIMIT: usize = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub items: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub model: Model,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub model: Model,
    pub scores: Vec<ScoreExport>,
}

#[derive(Debug, Serialize)]
pub struct SomethingElseResponse {
    pub recommendation: Option<DiversityPick>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreLikeThisRequest {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MoreLikeThisResponse {
    pub recommendations: Vec<DiversityPick>,
}

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

/// Runs CPU-bound scoring off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| GatewayError::InternalError(format!("scoring task failed: {}", e)))
}

#[instrument(skip(state, body))]
pub async fn predict_handler(
    State(state): State<HandlerState>,
    Path(model): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PredictResponse>, GatewayError> {
    let model: Model = model.parse()?;
    let request: PredictRequest = parse_body(body)?;
    let limit = request.limit.unwrap_or(DEFAULT_PREDICT_LIMIT);

    let context = state.context.clone();
    let ranked =
        run_blocking(move || context.predict(model, request.items.as_slice(), limit)).await??;

    info!(model = %model, returned = ranked.len(), "Prediction served");
    Ok(Json(PredictResponse {
        model,
        predictions: vec![ranked.to_prediction()],
    }))
}

#[instrument(skip(state, body))]
pub async fn scores_handler(
    State(state): State<HandlerState>,
    Path(model): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ScoresResponse>, GatewayError> {
    let model: Model = model.parse()?;
    let request: PredictRequest = parse_body(body)?;

    let context = state.context.clone();
    let export = run_blocking(move || context.export(model, request.items.as_slice())).await??;

    debug!(model = %model, items = export.item_ids.len(), "Score export served");
    Ok(Json(ScoresResponse {
        model,
        scores: vec![export],
    }))
}

#[instrument(skip(state, body))]
pub async fn something_else_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SomethingElseResponse>, GatewayError> {
    let request: DiversityRequest = parse_body(body)?;

    let selector = state.selector.clone();
    let recommendation = run_blocking(move || selector.select(&request)).await?;

    if recommendation.is_none() {
        debug!("No recommendation available");
    }
    Ok(Json(SomethingElseResponse { recommendation }))
}

#[instrument(skip(state, body))]
pub async fn more_like_this_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MoreLikeThisResponse>, GatewayError> {
    let request: MoreLikeThisRequest = parse_body(body)?;
    let limit = request.limit.unwrap_or(DEFAULT_RELATED_LIMIT);

    let selector = state.selector.clone();
    let recommendations = run_blocking(move || {
        selector.related(request.item_id.as_deref(), request.title.as_deref(), limit)
    })
    .await?;

    Ok(Json(MoreLikeThisResponse { recommendations }))
}
