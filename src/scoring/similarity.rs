//! Cosine similarity against L2-normalized catalog embeddings.

use nalgebra::{DMatrix, DVector};

use super::error::ScoringError;
use super::types::{ScoreVector, Scorer, apply_mask, check_len, observed_mask};
use crate::catalog::{Catalog, CatalogError};
use crate::constants::DEFAULT_MASK_VALUE;

#[derive(Debug, Clone)]
pub struct CosineSimilarityScorer {
    normalized: DMatrix<f64>,
    mask_value: f64,
}

impl CosineSimilarityScorer {
    /// Normalizes every catalog row once. A zero-norm row is a data error.
    pub fn new(catalog: &Catalog) -> Result<Self, CatalogError> {
        let mut normalized = catalog.embeddings().clone();

        for (i, mut row) in normalized.row_iter_mut().enumerate() {
            let norm = row.norm();
            if norm == 0.0 {
                return Err(CatalogError::ZeroNormEmbedding {
                    item_id: catalog.item_id(i).to_string(),
                });
            }
            row.unscale_mut(norm);
        }

        Ok(Self {
            normalized,
            mask_value: DEFAULT_MASK_VALUE,
        })
    }

    pub fn with_mask_value(mut self, mask_value: f64) -> Self {
        self.mask_value = mask_value;
        self
    }

    pub fn len(&self) -> usize {
        self.normalized.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.nrows() == 0
    }

    /// Similarity of every item to the aggregated query, without masking.
    pub fn similarities(&self, interactions: &[f64]) -> Result<Vec<f64>, ScoringError> {
        check_len(self.normalized.nrows(), interactions)?;

        let weights = DVector::from_column_slice(interactions);
        let mut query = self.normalized.tr_mul(&weights);

        let norm = query.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(ScoringError::DegenerateQuery);
        }
        query.unscale_mut(norm);

        let scores = &self.normalized * &query;
        Ok(scores.as_slice().to_vec())
    }
}

impl Scorer for CosineSimilarityScorer {
    fn score(&self, interactions: &[f64]) -> Result<ScoreVector, ScoringError> {
        let mut scores = self.similarities(interactions)?;
        apply_mask(&mut scores, &observed_mask(interactions), self.mask_value);
        Ok(ScoreVector::new(scores, self.mask_value))
    }

    fn mask_value(&self) -> f64 {
        self.mask_value
    }
}
