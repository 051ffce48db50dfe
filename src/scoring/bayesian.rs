//! Closed-form Bayesian linear regression over item embeddings.
//!
//! For an interaction vector `y` and catalog matrix `X` (`N × d`):
//!
//! ```text
//! A  = λ·I + Xobsᵀ·Xobs / σ²
//! μ  = A⁻¹ · Xobsᵀ·yobs / σ²
//! m  = X·μ
//! s² = diag(X·A⁻¹·Xᵀ)
//! score = m + z·√max(s², 0)
//! ```
//!
//! `A` is strictly positive-definite for any `λ > 0`, so it is inverted through its
//! Cholesky factor. Observed rows are folded into `A` as rank-1 updates and the
//! predictive variance is a row-wise quadratic form; neither the observed sub-matrix
//! nor the `N × N` product is materialized.

use nalgebra::{DMatrix, DVector};
use std::sync::Arc;
use tracing::debug;

use super::error::ScoringError;
use super::types::{ScoreVector, Scorer, apply_mask, check_len, observed_mask};
use crate::catalog::Catalog;
use crate::config::BayesianConfig;

#[derive(Debug, Clone)]
pub struct BayesianPosteriorScorer {
    catalog: Arc<Catalog>,
    config: BayesianConfig,
}

impl BayesianPosteriorScorer {
    pub fn new(catalog: Arc<Catalog>, config: BayesianConfig) -> Result<Self, ScoringError> {
        if let Some((name, value, _)) = config.invalid_parameter() {
            return Err(ScoringError::InvalidParameter { name, value });
        }

        Ok(Self { catalog, config })
    }

    pub fn config(&self) -> &BayesianConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn posterior_scores(
        &self,
        interactions: &[f64],
        observed: &[bool],
    ) -> Result<Vec<f64>, ScoringError> {
        let x = self.catalog.embeddings();
        let d = x.ncols();
        let inv_sigma2 = 1.0 / self.config.sigma2;

        let mut precision = DMatrix::<f64>::identity(d, d) * self.config.lambda;
        let mut weighted_targets = DVector::<f64>::zeros(d);
        let mut n_observed = 0usize;

        for (i, _) in observed.iter().enumerate().filter(|(_, seen)| **seen) {
            let row = x.row(i).transpose();
            precision.ger(inv_sigma2, &row, &row, 1.0);
            weighted_targets.axpy(interactions[i] * inv_sigma2, &row, 1.0);
            n_observed += 1;
        }

        let inverse = precision
            .cholesky()
            .ok_or_else(|| ScoringError::ComputationFailed {
                reason: "posterior precision matrix is not positive-definite".to_string(),
            })?
            .inverse();

        let mu = &inverse * &weighted_targets;
        let mean = x * &mu;
        let projected = x * &inverse;

        let z = self.config.z;
        let scores = (0..x.nrows())
            .map(|i| {
                let variance = projected.row(i).dot(&x.row(i));
                mean[i] + z * variance.max(0.0).sqrt()
            })
            .collect();

        debug!(
            items = x.nrows(),
            dim = d,
            observed = n_observed,
            "Computed posterior scores"
        );

        Ok(scores)
    }
}

impl Scorer for BayesianPosteriorScorer {
    fn score(&self, interactions: &[f64]) -> Result<ScoreVector, ScoringError> {
        check_len(self.catalog.len(), interactions)?;

        let observed = observed_mask(interactions);
        let mut scores = self.posterior_scores(interactions, &observed)?;
        apply_mask(&mut scores, &observed, self.config.mask_value);

        Ok(ScoreVector::new(scores, self.config.mask_value))
    }

    fn mask_value(&self) -> f64 {
        self.config.mask_value
    }
}
