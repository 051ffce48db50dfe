use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::collaborators::FallbackItem;
use crate::ranking::RankedItem;

fn default_diversity_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Request for one "something else" pick.
pub struct DiversityRequest {
    /// Catalog id of the item being replaced.
    #[serde(default)]
    pub seed_item_id: Option<String>,
    /// Title of the seed. Defaults to the catalog title when omitted.
    #[serde(default)]
    pub seed_title: Option<String>,
    /// 1 is conservative; higher levels sample further down the ranking.
    #[serde(default = "default_diversity_level")]
    pub diversity_level: u32,
    #[serde(default)]
    pub exclude_item_ids: Vec<String>,
    /// Matched case-insensitively.
    #[serde(default)]
    pub exclude_titles: Vec<String>,
}

impl Default for DiversityRequest {
    fn default() -> Self {
        Self {
            seed_item_id: None,
            seed_title: None,
            diversity_level: default_diversity_level(),
            exclude_item_ids: Vec::new(),
            exclude_titles: Vec::new(),
        }
    }
}

impl DiversityRequest {
    pub fn for_item<S: Into<String>>(seed_item_id: S) -> Self {
        Self {
            seed_item_id: Some(seed_item_id.into()),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.diversity_level = level;
        self
    }

    pub fn with_seed_title<S: Into<String>>(mut self, title: S) -> Self {
        self.seed_title = Some(title.into());
        self
    }

    pub fn excluding_items<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_item_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn excluding_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_titles.extend(titles.into_iter().map(Into::into));
        self
    }

    /// Levels below 1 behave like level 1.
    pub fn level(&self) -> u32 {
        self.diversity_level.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PickOrigin {
    /// Sampled from the filtered posterior ranking.
    Ranked {
        position: usize,
        window_start: usize,
        window_end: usize,
    },
    /// Taken from the similarity ranking.
    Similar { rank: usize },
    /// Degraded-mode placeholder.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityPick {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub origin: PickOrigin,
}

impl DiversityPick {
    pub(crate) fn ranked(item: RankedItem, position: usize, window: &Range<usize>) -> Self {
        Self::from_item(
            item,
            PickOrigin::Ranked {
                position,
                window_start: window.start,
                window_end: window.end,
            },
        )
    }

    pub(crate) fn similar(item: RankedItem, rank: usize) -> Self {
        Self::from_item(item, PickOrigin::Similar { rank })
    }

    pub(crate) fn fallback(item: &FallbackItem, score: f64) -> Self {
        Self {
            item_id: item.item_id.clone(),
            title: Some(item.title.clone()),
            score,
            poster: None,
            year: None,
            origin: PickOrigin::Fallback,
        }
    }

    fn from_item(item: RankedItem, origin: PickOrigin) -> Self {
        Self {
            item_id: item.item_id,
            title: item.title,
            score: item.score,
            poster: item.poster,
            year: item.year,
            origin,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, PickOrigin::Fallback)
    }
}
