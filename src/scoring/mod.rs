//! Relevance scorers over the shared catalog.
//!
//! Both scorers implement [`Scorer`]: one interaction vector in, one [`ScoreVector`]
//! out. Every index with a nonzero interaction comes back as the mask value, so items
//! the user already signalled about never reappear in a ranking.
//!
//! - [`BayesianPosteriorScorer`] personalizes through a ridge-regression posterior with
//!   a confidence adjustment.
//! - [`CosineSimilarityScorer`] treats the interactions as a query and ranks by cosine
//!   similarity.

pub mod bayesian;
pub mod encoder;
pub mod error;
pub mod similarity;
pub mod types;


pub use bayesian::BayesianPosteriorScorer;
pub use encoder::{ItemEncoder, Polarity};
pub use error::ScoringError;
pub use similarity::CosineSimilarityScorer;
pub use types::{ScoreVector, Scorer};
