use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("interaction vector has length {actual}, catalog has {expected} items")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("query vector has zero magnitude; similarity direction is undefined")]
    DegenerateQuery,

    #[error("invalid scorer parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}
