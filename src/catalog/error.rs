use std::path::PathBuf;
use thiserror::Error;

/// Malformed catalog data. Fatal at construction time.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("embedding dimension must be positive")]
    ZeroDimension,

    #[error("column '{column}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("embedding for item '{item_id}' has {actual} values, expected {expected}")]
    RowDimensionMismatch {
        item_id: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate item id '{item_id}'")]
    DuplicateItemId { item_id: String },

    #[error("embedding for item '{item_id}' has a non-finite value at position {position}")]
    NonFiniteEmbedding { item_id: String, position: usize },

    #[error("embedding for item '{item_id}' has zero norm")]
    ZeroNormEmbedding { item_id: String },

    #[error("column '{column}' is present on some records but missing at line {line}")]
    PartialColumn { column: &'static str, line: usize },

    #[error("failed to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog record at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog embedding dimension rejected: {0}")]
    Dimension(#[from] crate::constants::DimValidationError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
