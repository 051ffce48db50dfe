//! Process-wide scoring context.
//!
//! Built once at startup and shared read-only (usually behind an `Arc`) by every
//! request. Nothing in here is mutated after construction, so concurrent requests need
//! no locking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError};
use crate::config::BayesianConfig;
use crate::ranking::{RankedList, ScoreExport, export_scores, top_k};
use crate::scoring::{
    BayesianPosteriorScorer, CosineSimilarityScorer, ItemEncoder, Polarity, ScoreVector, Scorer,
    ScoringError,
};

/// The scoring pipelines exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Recommended for you: posterior scores from positive signals.
    Rfy,
    /// Not for me: posterior scores with the signals' polarity inverted.
    #[serde(rename = "nfm")]
    NotForMe,
    /// More like this: cosine similarity to the given items.
    Similarity,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::NotForMe, Model::Rfy, Model::Similarity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Rfy => "rfy",
            Model::NotForMe => "nfm",
            Model::Similarity => "similarity",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown model '{name}', valid models: nfm, rfy, similarity")]
pub struct UnknownModel {
    pub name: String,
}

impl FromStr for Model {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rfy" => Ok(Model::Rfy),
            "nfm" => Ok(Model::NotForMe),
            "similarity" => Ok(Model::Similarity),
            other => Err(UnknownModel {
                name: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

#[derive(Debug, Clone)]
pub struct ScoringContext {
    catalog: Arc<Catalog>,
    encoder: ItemEncoder,
    posterior: BayesianPosteriorScorer,
    similarity: CosineSimilarityScorer,
}

impl ScoringContext {
    pub fn new(catalog: Catalog, config: BayesianConfig) -> Result<Self, ContextError> {
        let catalog = Arc::new(catalog);
        let similarity =
            CosineSimilarityScorer::new(&catalog)?.with_mask_value(config.mask_value);
        let posterior = BayesianPosteriorScorer::new(catalog.clone(), config)?;

        Ok(Self {
            encoder: ItemEncoder::new(catalog.clone()),
            catalog,
            posterior,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn encoder(&self) -> &ItemEncoder {
        &self.encoder
    }

    pub fn posterior(&self) -> &BayesianPosteriorScorer {
        &self.posterior
    }

    pub fn similarity(&self) -> &CosineSimilarityScorer {
        &self.similarity
    }

    /// Interaction vector a model feeds to its scorer.
    pub fn encode<S: AsRef<str>>(&self, model: Model, item_ids: &[S]) -> Vec<f64> {
        let polarity = match model {
            Model::NotForMe => Polarity::Negative,
            Model::Rfy | Model::Similarity => Polarity::Positive,
        };
        self.encoder.encode(item_ids, polarity)
    }

    pub fn score_interactions(
        &self,
        model: Model,
        interactions: &[f64],
    ) -> Result<ScoreVector, ScoringError> {
        match model {
            Model::Rfy | Model::NotForMe => self.posterior.score(interactions),
            Model::Similarity => self.similarity.score(interactions),
        }
    }

    pub fn score<S: AsRef<str>>(
        &self,
        model: Model,
        item_ids: &[S],
    ) -> Result<ScoreVector, ScoringError> {
        let interactions = self.encode(model, item_ids);
        self.score_interactions(model, &interactions)
    }

    pub fn predict<S: AsRef<str>>(
        &self,
        model: Model,
        item_ids: &[S],
        limit: usize,
    ) -> Result<RankedList, ScoringError> {
        let scores = self.score(model, item_ids)?;
        let ranked = top_k(&self.catalog, &scores, limit);
        debug!(
            model = %model,
            inputs = item_ids.len(),
            limit,
            returned = ranked.len(),
            "Prediction complete"
        );
        Ok(ranked)
    }

    pub fn export<S: AsRef<str>>(
        &self,
        model: Model,
        item_ids: &[S],
    ) -> Result<ScoreExport, ScoringError> {
        let scores = self.score(model, item_ids)?;
        Ok(export_scores(&self.catalog, &scores))
    }
}
