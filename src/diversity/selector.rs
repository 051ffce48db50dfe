use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::collaborators::{
    AcceptAllTitles, FallbackItem, FallbackProvider, StaticFallback, TitleValidity,
};
use super::tiers::{CANDIDATE_POOL_SIZE, sampling_window, similarity_limit};
use super::types::{DiversityPick, DiversityRequest};
use crate::context::ScoringContext;
use crate::ranking::{RankedItem, top_k};
use crate::scoring::{Scorer, ScoringError};

/// Picks a related-but-different item for a seed.
///
/// Stateless across calls; the context is shared and read-only, everything else lives
/// for the duration of one request.
#[derive(Clone)]
pub struct DiversitySelector {
    context: Arc<ScoringContext>,
    validity: Arc<dyn TitleValidity>,
    fallback: Arc<dyn FallbackProvider>,
    similarity: Option<Arc<dyn Scorer>>,
}

impl std::fmt::Debug for DiversitySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiversitySelector")
            .field("items", &self.context.catalog().len())
            .finish_non_exhaustive()
    }
}

impl DiversitySelector {
    pub fn new(context: Arc<ScoringContext>) -> Self {
        Self {
            context,
            validity: Arc::new(AcceptAllTitles),
            fallback: Arc::new(StaticFallback::default()),
            similarity: None,
        }
    }

    pub fn with_validity<V: TitleValidity + 'static>(mut self, validity: V) -> Self {
        self.validity = Arc::new(validity);
        self
    }

    pub fn with_fallback<F: FallbackProvider + 'static>(mut self, fallback: F) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Replaces the context's cosine scorer for the too-similar filter and "more like this".
    pub fn with_similarity<S: Scorer + 'static>(mut self, similarity: S) -> Self {
        self.similarity = Some(Arc::new(similarity));
        self
    }

    pub fn context(&self) -> &ScoringContext {
        &self.context
    }

    fn similarity(&self) -> &dyn Scorer {
        match &self.similarity {
            Some(scorer) => scorer.as_ref(),
            None => self.context.similarity(),
        }
    }

    pub fn select(&self, request: &DiversityRequest) -> Option<DiversityPick> {
        self.select_with_rng(request, &mut rand::thread_rng())
    }

    pub fn select_with_rng<R: Rng>(
        &self,
        request: &DiversityRequest,
        rng: &mut R,
    ) -> Option<DiversityPick> {
        let catalog = self.context.catalog();
        let level = request.level();

        let Some(seed) = request
            .seed_item_id
            .as_deref()
            .and_then(|id| catalog.index_of(id))
        else {
            warn!(
                seed_item_id = ?request.seed_item_id,
                "Seed item not in catalog, using fallback"
            );
            return self.fallback_pick(request, request.seed_title.as_deref(), rng);
        };

        let seed_title = request
            .seed_title
            .as_deref()
            .or_else(|| catalog.title(seed));

        let too_similar = self.too_similar(seed, level);

        let pool = match self.candidate_pool(seed) {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "Candidate scoring failed, using fallback");
                return self.fallback_pick(request, seed_title, rng);
            }
        };
        let pool_len = pool.len();

        let filtered = self.filter_pool(pool, &too_similar, request);
        info!(
            level,
            pool = pool_len,
            remaining = filtered.len(),
            too_similar = too_similar.len(),
            "Filtered candidate pool"
        );

        if filtered.is_empty() {
            warn!("No sufficiently different candidates after filtering, using fallback");
            return self.fallback_pick(request, seed_title, rng);
        }

        let window = sampling_window(level, filtered.len());
        let position = rng.gen_range(window.clone());
        let item = filtered.into_iter().nth(position)?;

        info!(
            item_id = %item.item_id,
            title = ?item.title,
            position,
            window_start = window.start,
            window_end = window.end,
            "Selected something else"
        );

        Some(DiversityPick::ranked(item, position, &window))
    }

    /// Nearest neighbours of the seed by similarity.
    ///
    /// A scorer failure degrades to an empty set rather than failing the request.
    fn too_similar(&self, seed: usize, level: u32) -> HashSet<String> {
        let limit = similarity_limit(level);
        let interactions = self.one_hot(seed);

        match self.similarity().score(&interactions) {
            Ok(scores) => {
                let set: HashSet<String> = top_k(self.context.catalog(), &scores, limit)
                    .into_iter()
                    .map(|item| item.item_id)
                    .collect();
                debug!(level, excluded = set.len(), "Filtering most similar items");
                set
            }
            Err(e) => {
                warn!(error = %e, "Similarity unavailable, skipping similarity filter");
                HashSet::new()
            }
        }
    }

    fn candidate_pool(&self, seed: usize) -> Result<Vec<RankedItem>, ScoringError> {
        let scores = self.context.posterior().score(&self.one_hot(seed))?;
        Ok(top_k(self.context.catalog(), &scores, CANDIDATE_POOL_SIZE).into_items())
    }

    fn filter_pool(
        &self,
        pool: Vec<RankedItem>,
        too_similar: &HashSet<String>,
        request: &DiversityRequest,
    ) -> Vec<RankedItem> {
        let excluded_ids: HashSet<&str> =
            request.exclude_item_ids.iter().map(String::as_str).collect();
        let excluded_titles = lowercase_set(&request.exclude_titles);

        pool.into_iter()
            .filter(|item| {
                let title = item.title.as_deref();
                title.is_none_or(|t| self.validity.is_valid_title(t))
                    && !too_similar.contains(&item.item_id)
                    && !excluded_ids.contains(item.item_id.as_str())
                    && !title.is_some_and(|t| excluded_titles.contains(&t.to_lowercase()))
            })
            .collect()
    }

    fn fallback_pick<R: Rng>(
        &self,
        request: &DiversityRequest,
        seed_title: Option<&str>,
        rng: &mut R,
    ) -> Option<DiversityPick> {
        let excluded_ids: HashSet<&str> =
            request.exclude_item_ids.iter().map(String::as_str).collect();
        let mut excluded_titles = lowercase_set(&request.exclude_titles);
        if let Some(title) = seed_title {
            excluded_titles.insert(title.to_lowercase());
        }

        let available: Vec<FallbackItem> = self
            .fallback
            .something_else()
            .into_iter()
            .filter(|c| {
                !excluded_ids.contains(c.item_id.as_str())
                    && !excluded_titles.contains(&c.title.to_lowercase())
            })
            .collect();

        let choice = available.choose(rng)?;
        let score = rng.gen_range(0.0..1.0);
        debug!(title = %choice.title, "Selected fallback item");
        Some(DiversityPick::fallback(choice, score))
    }

    pub fn related(
        &self,
        seed_item_id: Option<&str>,
        seed_title: Option<&str>,
        limit: usize,
    ) -> Vec<DiversityPick> {
        self.related_with_rng(seed_item_id, seed_title, limit, &mut rand::thread_rng())
    }

    /// "More like this": the closest items to the seed, minus the seed and invalid
    /// titles. Over-fetches `3 * limit + 1` to leave room for filtering.
    pub fn related_with_rng<R: Rng>(
        &self,
        seed_item_id: Option<&str>,
        seed_title: Option<&str>,
        limit: usize,
        rng: &mut R,
    ) -> Vec<DiversityPick> {
        let catalog = self.context.catalog();

        let Some(seed) = seed_item_id.and_then(|id| catalog.index_of(id)) else {
            warn!(?seed_item_id, "Seed item not in catalog, using fallback");
            return self.fallback_related(seed_title, limit, rng);
        };

        let fetch = limit.saturating_mul(3).saturating_add(1);
        let ranked = match self.similarity().score(&self.one_hot(seed)) {
            Ok(scores) => top_k(catalog, &scores, fetch),
            Err(e) => {
                warn!(error = %e, "Similarity scoring failed, using fallback");
                return self.fallback_related(seed_title, limit, rng);
            }
        };

        if ranked.is_empty() {
            return self.fallback_related(seed_title, limit, rng);
        }

        let seed_id = catalog.item_id(seed);
        ranked
            .into_iter()
            .filter(|item| {
                item.item_id != seed_id
                    && item
                        .title
                        .as_deref()
                        .is_none_or(|t| self.validity.is_valid_title(t))
            })
            .take(limit)
            .enumerate()
            .map(|(rank, item)| DiversityPick::similar(item, rank))
            .collect()
    }

    fn fallback_related<R: Rng>(
        &self,
        seed_title: Option<&str>,
        limit: usize,
        rng: &mut R,
    ) -> Vec<DiversityPick> {
        let seed_title = seed_title.map(str::to_lowercase);
        let mut available: Vec<FallbackItem> = self
            .fallback
            .more_like_this()
            .into_iter()
            .filter(|c| seed_title.as_deref() != Some(c.title.to_lowercase().as_str()))
            .collect();
        available.shuffle(rng);

        available
            .iter()
            .take(limit)
            .map(|c| DiversityPick::fallback(c, rng.gen_range(0.0..1.0)))
            .collect()
    }

    fn one_hot(&self, seed: usize) -> Vec<f64> {
        let mut interactions = vec![0.0; self.context.catalog().len()];
        interactions[seed] = 1.0;
        interactions
    }
}

fn lowercase_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}
