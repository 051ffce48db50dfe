//! Cross-cutting, shared constants.
//!
//! The selection tiers used by [`crate::diversity`] live next to the selector; this
//! module holds the numeric defaults shared by configuration, scorers and the server.

/// Embedding width of the production catalog.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Ridge regularization strength (prior precision) of the posterior scorer.
pub const DEFAULT_LAMBDA: f64 = 1.0;

/// Observation-noise variance of the posterior scorer.
pub const DEFAULT_SIGMA2: f64 = 1.0;

/// Confidence multiplier. Negative values give a lower confidence bound.
pub const DEFAULT_Z: f64 = -1.1645;

/// Score written at every index that must never be ranked.
pub const DEFAULT_MASK_VALUE: f64 = f64::NEG_INFINITY;

/// Number of items returned by a prediction when the caller does not ask for more.
pub const DEFAULT_PREDICT_LIMIT: usize = 10;

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// Use this at load boundaries so a catalog built for a different embedding model is
/// rejected before any scorer is constructed.
pub fn validate_embedding_dim(expected: usize, actual: usize) -> Result<(), DimValidationError> {
    if actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if expected != actual {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}
