use super::error::ScoringError;

#[derive(Debug, Clone, PartialEq)]
/// Per-item scores aligned to catalog order.
pub struct ScoreVector {
    values: Vec<f64>,
    mask_value: f64,
}

impl ScoreVector {
    pub fn new(values: Vec<f64>, mask_value: f64) -> Self {
        Self { values, mask_value }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn mask_value(&self) -> f64 {
        self.mask_value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Returns `true` if the item at `index` must not be ranked.
    ///
    /// NaN scores count as masked so they never reach a ranking.
    pub fn is_masked(&self, index: usize) -> bool {
        let value = self.values[index];
        value == self.mask_value || value.is_nan()
    }

    pub fn masked_count(&self) -> usize {
        (0..self.values.len()).filter(|&i| self.is_masked(i)).count()
    }
}

/// Returns the observed-item mask shared by the posterior and the masking post-pass.
pub(crate) fn observed_mask(interactions: &[f64]) -> Vec<bool> {
    interactions.iter().map(|&v| v != 0.0).collect()
}

pub(crate) fn check_len(expected: usize, interactions: &[f64]) -> Result<(), ScoringError> {
    if interactions.len() != expected {
        return Err(ScoringError::DimensionMismatch {
            expected,
            actual: interactions.len(),
        });
    }
    Ok(())
}

/// Overwrites every observed index with `mask_value`.
pub(crate) fn apply_mask(scores: &mut [f64], observed: &[bool], mask_value: f64) {
    for (score, _) in scores.iter_mut().zip(observed).filter(|(_, seen)| **seen) {
        *score = mask_value;
    }
}

/// Scores every catalog item for one interaction vector.
pub trait Scorer: Send + Sync {
    fn score(&self, interactions: &[f64]) -> Result<ScoreVector, ScoringError>;

    fn mask_value(&self) -> f64;

    /// Scores each row independently.
    fn score_batch(&self, batch: &[Vec<f64>]) -> Result<Vec<ScoreVector>, ScoringError> {
        batch.iter().map(|row| self.score(row)).collect()
    }
}
