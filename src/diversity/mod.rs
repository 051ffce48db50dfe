//! "Something else" selection.
//!
//! Given a seed item, pick one recommendation that is still relevant but clearly not
//! a near-duplicate:
//!
//! 1. The seed's nearest neighbours by cosine similarity are marked as too similar
//!    (the count shrinks as the diversity level grows).
//! 2. The posterior scorer ranks the catalog for the seed; its top
//!    [`CANDIDATE_POOL_SIZE`] items form the pool.
//! 3. Invalid titles, too-similar items and caller exclusions are dropped.
//! 4. One item is drawn uniformly from a window of the filtered ranking that moves
//!    further down the list as the level grows.
//!
//! Similarity failures shrink step 1 to nothing; an empty pool or an unusable seed
//! switches to a [`FallbackProvider`].

pub mod collaborators;
pub mod error;
pub mod selector;
pub mod tiers;
pub mod types;

#[cfg(test)]
mod tests;

pub use collaborators::{
    AcceptAllTitles, FallbackItem, FallbackProvider, StaticFallback, TitlePatterns, TitleValidity,
};
pub use error::DiversityError;
pub use selector::DiversitySelector;
pub use tiers::{
    CANDIDATE_POOL_SIZE, FALLBACK_WINDOW, sampling_window, similarity_limit, window_bounds,
};
pub use types::{DiversityPick, DiversityRequest, PickOrigin};
