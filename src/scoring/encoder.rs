use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::catalog::Catalog;

/// Sign given to every encoded item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Engaged or liked.
    Positive,
    /// Explicitly not interested.
    Negative,
}

impl Polarity {
    fn weight(self) -> f64 {
        match self {
            Polarity::Positive => 1.0,
            Polarity::Negative => -1.0,
        }
    }
}

/// Multi-hot encoding of item ids over the catalog index space.
#[derive(Debug, Clone)]
pub struct ItemEncoder {
    catalog: Arc<Catalog>,
}

impl ItemEncoder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Unknown ids are skipped; repeated ids count once.
    pub fn encode<S: AsRef<str>>(&self, item_ids: &[S], polarity: Polarity) -> Vec<f64> {
        let mut interactions = vec![0.0; self.catalog.len()];
        let mut unknown: HashSet<&str> = HashSet::new();

        for item_id in item_ids {
            let item_id = item_id.as_ref();
            match self.catalog.index_of(item_id) {
                Some(index) => interactions[index] = polarity.weight(),
                None => {
                    unknown.insert(item_id);
                }
            }
        }

        if !unknown.is_empty() {
            warn!(
                unknown = unknown.len(),
                "Ignoring item ids that are not in the catalog"
            );
        }

        interactions
    }

    pub fn encode_batch<S: AsRef<str>>(
        &self,
        batch: &[Vec<S>],
        polarity: Polarity,
    ) -> Vec<Vec<f64>> {
        batch
            .iter()
            .map(|item_ids| self.encode(item_ids, polarity))
            .collect()
    }
}
