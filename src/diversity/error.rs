use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiversityError {
    #[error("invalid title pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
