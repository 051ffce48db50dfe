//! FF1000 recommendation library (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Catalog
//! - [`Catalog`], [`CatalogColumns`] - Item ids, embeddings and display metadata
//! - [`CatalogLoader`], [`JsonLinesLoader`] - Loading a catalog from disk
//!
//! ## Scoring
//! - [`BayesianPosteriorScorer`] - Posterior lower-confidence-bound scores
//! - [`CosineSimilarityScorer`] - Nearest-neighbour scores
//! - [`ItemEncoder`], [`Polarity`] - Item ids to interaction vectors
//! - [`ScoringContext`], [`Model`] - The three served models over one catalog
//!
//! ## Ranking & Diversity
//! - [`top_k`], [`RankedList`], [`Prediction`], [`ScoreExport`] - Ordered output
//! - [`DiversitySelector`], [`DiversityRequest`] - "Something else" and "more like this"
//!
//! ## Configuration
//! - [`Config`], [`BayesianConfig`], [`ConfigError`] - Environment-driven settings
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod diversity;
pub mod ranking;
pub mod scoring;

#[cfg(any(test, feature = "mock"))]
pub use catalog::MockCatalogLoader;
pub use catalog::{
    Catalog, CatalogColumns, CatalogError, CatalogLoader, CatalogRecord, CatalogResult,
    JsonLinesLoader,
};

pub use config::{BayesianConfig, Config, ConfigError};
pub use constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_LAMBDA, DEFAULT_MASK_VALUE, DEFAULT_PREDICT_LIMIT,
    DEFAULT_SIGMA2, DEFAULT_Z, DimValidationError, validate_embedding_dim,
};
pub use context::{ContextError, Model, ScoringContext, UnknownModel};
pub use diversity::{
    AcceptAllTitles, DiversityError, DiversityPick, DiversityRequest, DiversitySelector,
    FallbackItem, FallbackProvider, PickOrigin, StaticFallback, TitlePatterns, TitleValidity,
};
pub use ranking::{Prediction, RankedItem, RankedList, ScoreExport, export_scores, top_k};
pub use scoring::{
    BayesianPosteriorScorer, CosineSimilarityScorer, ItemEncoder, Polarity, ScoreVector, Scorer,
    ScoringError,
};
