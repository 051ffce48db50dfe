//! Score vectors to caller-visible ranked lists.
//!
//! Ordering is strictly by descending score; equal scores keep catalog order, so the
//! same input always produces the same list. Masked entries never appear.


use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

use crate::catalog::Catalog;
use crate::scoring::ScoreVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One ranked item with its metadata.
pub struct RankedItem {
    /// Position of the item in catalog order.
    #[serde(skip)]
    pub index: usize,
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedList {
    items: Vec<RankedItem>,
}

impl RankedList {
    pub fn items(&self) -> &[RankedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<RankedItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedItem> {
        self.items.iter()
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Column-oriented wire form; every array has the same length.
    pub fn to_prediction(&self) -> Prediction {
        Prediction {
            item_ids: self.items.iter().map(|i| i.item_id.clone()).collect(),
            titles: self.items.iter().map(|i| i.title.clone()).collect(),
            posters: self.items.iter().map(|i| i.poster.clone()).collect(),
            premiere_years: self.items.iter().map(|i| i.year).collect(),
            scores: self.items.iter().map(|i| i.score).collect(),
        }
    }
}

impl IntoIterator for RankedList {
    type Item = RankedItem;
    type IntoIter = std::vec::IntoIter<RankedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a RankedItem;
    type IntoIter = std::slice::Iter<'a, RankedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub item_ids: Vec<String>,
    pub titles: Vec<Option<String>>,
    pub posters: Vec<Option<String>>,
    pub premiere_years: Vec<Option<i32>>,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Full score vector keyed by item id. Masked scores serialize as `null`.
pub struct ScoreExport {
    pub item_ids: Vec<String>,
    pub scores: Vec<f64>,
}

/// Returns the `k` best unmasked items.
///
/// Fewer than `k` items come back when the catalog runs out of unmasked entries. A score
/// vector that is not aligned with the catalog ranks nothing.
pub fn top_k(catalog: &Catalog, scores: &ScoreVector, k: usize) -> RankedList {
    if scores.len() != catalog.len() {
        warn!(
            expected = catalog.len(),
            actual = scores.len(),
            "Score vector does not match catalog, nothing to rank"
        );
        return RankedList::default();
    }

    let values = scores.values();
    let mut order: Vec<usize> = (0..values.len())
        .filter(|&i| !scores.is_masked(i))
        .collect();

    let by_rank = |a: &usize, b: &usize| {
        values[*b]
            .partial_cmp(&values[*a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b))
    };

    if k < order.len() {
        order.select_nth_unstable_by(k, by_rank);
        order.truncate(k);
    }
    order.sort_unstable_by(by_rank);

    let items = order
        .into_iter()
        .map(|index| RankedItem {
            index,
            item_id: catalog.item_id(index).to_string(),
            title: catalog.title(index).map(str::to_string),
            poster: catalog.poster(index).map(str::to_string),
            year: catalog.premiere_year(index),
            score: values[index],
        })
        .collect();

    RankedList { items }
}

pub fn export_scores(catalog: &Catalog, scores: &ScoreVector) -> ScoreExport {
    ScoreExport {
        item_ids: catalog.item_ids().to_vec(),
        scores: scores.values().to_vec(),
    }
}
