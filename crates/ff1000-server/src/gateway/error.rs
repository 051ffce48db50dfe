use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use ff1000::context::UnknownModel;
use ff1000::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    UnknownModel(#[from] UnknownModel),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("scoring failed: {0}")]
    ScoringFailed(#[from] ScoringError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl GatewayError {
    /// Stable error name reported in the response body.
    pub fn name(&self) -> &'static str {
        match self {
            GatewayError::UnknownModel(_) => "UnknownModel",
            GatewayError::InvalidRequest(_) => "BadRequest",
            GatewayError::ScoringFailed(e) => match e {
                ScoringError::DimensionMismatch { .. } => "DimensionMismatch",
                ScoringError::DegenerateQuery => "DegenerateQuery",
                ScoringError::InvalidParameter { .. } => "InvalidParameter",
                ScoringError::ComputationFailed { .. } => "ComputationFailed",
            },
            GatewayError::InternalError(_) => "InternalServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UnknownModel(_) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::ScoringFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.name(),
            message: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
