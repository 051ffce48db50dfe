use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::Arc;

use super::*;
use crate::catalog::{Catalog, CatalogColumns};
use crate::config::BayesianConfig;
use crate::context::{Model, ScoringContext};
use crate::scoring::{ScoreVector, Scorer, ScoringError};

const ITEMS: usize = 150;
const SEED: &str = "item-140";

fn embedding(i: usize) -> Vec<f64> {
    vec![
        1.0 + (i % 7) as f64,
        ((i * 3) % 11) as f64 * 0.5,
        ((i * 13) % 17) as f64 * 0.25,
    ]
}

fn context() -> Arc<ScoringContext> {
    let ids = (0..ITEMS).map(|i| format!("item-{i}")).collect();
    let embeddings = (0..ITEMS).map(embedding).collect();
    let columns = CatalogColumns {
        titles: Some((0..ITEMS).map(|i| format!("Title {i}")).collect()),
        ..Default::default()
    };
    let catalog = Catalog::new(ids, embeddings, columns).expect("catalog");
    Arc::new(ScoringContext::new(catalog, BayesianConfig::default()).expect("context"))
}

fn selector() -> DiversitySelector {
    DiversitySelector::new(context())
}

fn ranked_window(pick: &DiversityPick) -> (usize, usize, usize) {
    match pick.origin {
        PickOrigin::Ranked {
            position,
            window_start,
            window_end,
        } => (position, window_start, window_end),
        ref other => panic!("expected a ranked pick, got {other:?}"),
    }
}

#[test]
fn test_similarity_limit_tiers() {
    assert_eq!(similarity_limit(1), 5);
    assert_eq!(similarity_limit(2), 5);
    assert_eq!(similarity_limit(3), 5);
    assert_eq!(similarity_limit(4), 5);
    assert_eq!(similarity_limit(5), 3);
    assert_eq!(similarity_limit(6), 3);
    assert_eq!(similarity_limit(7), 2);
    assert_eq!(similarity_limit(42), 2);
}

#[test]
fn test_sampling_window_tiers() {
    assert_eq!(sampling_window(1, 144), 10..45);
    assert_eq!(sampling_window(2, 144), 10..45);
    assert_eq!(sampling_window(3, 144), 20..65);
    assert_eq!(sampling_window(4, 144), 20..65);
    assert_eq!(sampling_window(5, 144), 30..90);
    assert_eq!(sampling_window(9, 144), 30..90);
}

#[test]
fn test_sampling_window_clamps_to_pool() {
    assert_eq!(sampling_window(9, 40), 30..40);
    assert_eq!(sampling_window(9, 25), 24..25);
    assert_eq!(sampling_window(1, 5), 4..5);
    assert_eq!(sampling_window(1, 1), 0..1);
    assert_eq!(sampling_window(1, 0), 0..0);
}

#[test]
fn test_request_defaults_from_json() {
    let request: DiversityRequest =
        serde_json::from_value(serde_json::json!({"seed_item_id": "item-1"})).expect("json");
    assert_eq!(request.diversity_level, 1);
    assert!(request.exclude_item_ids.is_empty());
    assert_eq!(DiversityRequest::for_item("x").with_level(0).level(), 1);
}

#[test]
fn test_pick_comes_from_level_window() {
    let selector = selector();
    let request = DiversityRequest::for_item(SEED).with_level(1);

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("pick");
        let (position, start, end) = ranked_window(&pick);
        assert_eq!((start, end), (10, 45));
        assert!((start..end).contains(&position));
        assert_ne!(pick.item_id, SEED);
    }
}

#[test]
fn test_higher_level_moves_window_down() {
    let selector = selector();
    let mut rng = StdRng::seed_from_u64(11);

    let low = selector
        .select_with_rng(&DiversityRequest::for_item(SEED).with_level(1), &mut rng)
        .expect("level 1 pick");
    let high = selector
        .select_with_rng(&DiversityRequest::for_item(SEED).with_level(9), &mut rng)
        .expect("level 9 pick");

    let (_, low_start, _) = ranked_window(&low);
    let (_, high_start, _) = ranked_window(&high);
    assert!(high_start >= low_start);
    assert_eq!(high_start, 30);
}

#[test]
fn test_never_returns_excluded_ids_or_titles() {
    let selector = selector();
    let excluded_ids: Vec<String> = (0..100).map(|i| format!("item-{i}")).collect();
    let excluded_titles: Vec<String> = (100..121).map(|i| format!("TITLE {i}")).collect();
    let request = DiversityRequest::for_item(SEED)
        .with_level(2)
        .excluding_items(excluded_ids.clone())
        .excluding_titles(excluded_titles);

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("pick");
        assert!(!pick.is_fallback());

        let index: usize = pick
            .item_id
            .strip_prefix("item-")
            .and_then(|n| n.parse().ok())
            .expect("catalog id");
        assert!(index >= 121, "picked excluded item {}", pick.item_id);
        assert_ne!(pick.item_id, SEED);
    }
}

#[test]
fn test_most_similar_items_are_never_picked() {
    let selector = selector();
    let similar: HashSet<String> = selector
        .context()
        .predict(Model::Similarity, &[SEED], similarity_limit(1))
        .expect("similarity")
        .into_iter()
        .map(|i| i.item_id)
        .collect();
    assert_eq!(similar.len(), 5);

    let request = DiversityRequest::for_item(SEED);
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("pick");
        assert!(!similar.contains(&pick.item_id));
    }
}

#[test]
fn test_title_validity_filters_pool() {
    let selector = selector().with_validity(|title: &str| !title.ends_with('7'));
    let request = DiversityRequest::for_item(SEED).with_level(5);

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("pick");
        assert!(!pick.title.as_deref().unwrap_or_default().ends_with('7'));
    }
}

#[test]
fn test_same_rng_seed_same_pick() {
    let selector = selector();
    let request = DiversityRequest::for_item(SEED).with_level(3);

    let first = selector.select_with_rng(&request, &mut StdRng::seed_from_u64(99));
    let second = selector.select_with_rng(&request, &mut StdRng::seed_from_u64(99));
    assert_eq!(first, second);
}

#[test]
fn test_empty_pool_uses_fallback() {
    let selector = selector().with_validity(|_: &str| false);
    let request = DiversityRequest::for_item(SEED).excluding_titles(["ARRIVAL"]);

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("fallback pick");
        assert!(pick.is_fallback());
        assert!(pick.item_id.starts_with("mock-"));
        assert_ne!(pick.title.as_deref(), Some("Arrival"));
        assert!((0.0..1.0).contains(&pick.score));
        assert!(pick.poster.is_none());
    }
}

#[test]
fn test_unknown_seed_uses_fallback_without_seed_title() {
    let selector = selector();
    let request = DiversityRequest::for_item("not-in-catalog").with_seed_title("parasite");

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("fallback pick");
        assert!(pick.is_fallback());
        assert_ne!(pick.title.as_deref(), Some("Parasite"));
    }
}

#[test]
fn test_missing_seed_id_uses_fallback() {
    let selector = selector();
    let pick = selector
        .select_with_rng(&DiversityRequest::default(), &mut StdRng::seed_from_u64(1))
        .expect("fallback pick");
    assert!(pick.is_fallback());
}

#[test]
fn test_exhausted_fallback_returns_none() {
    let selector = selector().with_fallback(StaticFallback::new(&["The Seed"], &[]));
    let request = DiversityRequest::for_item("unknown").with_seed_title("THE SEED");

    assert!(
        selector
            .select_with_rng(&request, &mut StdRng::seed_from_u64(3))
            .is_none()
    );
}

#[test]
fn test_fallback_respects_exclusions() {
    let selector = selector().with_fallback(StaticFallback::new(&["Arrival", "Whiplash"], &[]));
    let request = DiversityRequest::for_item("unknown")
        .excluding_items(["mock-arrival"])
        .excluding_titles(["whiplash"]);

    assert!(
        selector
            .select_with_rng(&request, &mut StdRng::seed_from_u64(3))
            .is_none()
    );
}

#[test]
fn test_related_returns_nearest_without_seed() {
    let selector = selector();
    let expected: Vec<String> = selector
        .context()
        .predict(Model::Similarity, &[SEED], 3)
        .expect("similarity")
        .into_iter()
        .map(|i| i.item_id)
        .collect();

    let related = selector.related_with_rng(Some(SEED), None, 3, &mut StdRng::seed_from_u64(0));
    let ids: Vec<String> = related.iter().map(|p| p.item_id.clone()).collect();

    assert_eq!(ids, expected);
    assert!(related.iter().all(|p| p.item_id != SEED));
    assert_eq!(related[0].origin, PickOrigin::Similar { rank: 0 });
    assert_eq!(related[2].origin, PickOrigin::Similar { rank: 2 });
}

#[test]
fn test_related_skips_invalid_titles() {
    let blocked: HashSet<String> = selector()
        .context()
        .predict(Model::Similarity, &[SEED], 2)
        .expect("similarity")
        .into_iter()
        .filter_map(|i| i.title)
        .collect();

    let selector = selector().with_validity(move |t: &str| !blocked.contains(t));
    let related = selector.related_with_rng(Some(SEED), None, 2, &mut StdRng::seed_from_u64(0));

    assert_eq!(related.len(), 2);
    assert!(
        related
            .iter()
            .all(|p| matches!(p.origin, PickOrigin::Similar { .. }))
    );
}

#[test]
fn test_related_unknown_seed_uses_fallback() {
    let selector = selector();
    let related = selector.related_with_rng(
        Some("unknown"),
        Some("barbie"),
        4,
        &mut StdRng::seed_from_u64(5),
    );

    assert_eq!(related.len(), 4);
    assert!(related.iter().all(DiversityPick::is_fallback));
    assert!(related.iter().all(|p| p.title.as_deref() != Some("Barbie")));
}

#[test]
fn test_promotional_patterns_reject_non_content() {
    let patterns = TitlePatterns::promotional().expect("patterns");
    assert_eq!(patterns.patterns().len(), 4);

    for title in [
        "Barbie (with ASL)",
        "Oppenheimer ASL edition",
        "Dune: Official Trailer",
        "Sneak Peek: Season 2",
        "What's On in October",
        "The 1980s Rewind",
        "the 90s are back? no, THE 1990S",
        "Reframed: Marilyn Monroe",
        "The Making Of Dune",
        "Deleted Scenes",
    ] {
        assert!(!patterns.is_valid_title(title), "{title} should be rejected");
    }

    for title in ["Dune", "Parasite", "1984", "The Class of 1999", "Blade Runner 2049"] {
        assert!(patterns.is_valid_title(title), "{title} should be accepted");
    }
}

#[test]
fn test_invalid_title_pattern_is_an_error() {
    assert!(matches!(
        TitlePatterns::new(["(unclosed"]),
        Err(DiversityError::InvalidPattern(_))
    ));
}

#[test]
fn test_decade_rails_never_selected() {
    let ids = (0..ITEMS).map(|i| format!("item-{i}")).collect();
    let embeddings = (0..ITEMS).map(embedding).collect();
    let titles = (0..ITEMS)
        .map(|i| {
            if i % 2 == 0 {
                format!("The {}s Rewind", 1900 + i)
            } else {
                format!("Title {i}")
            }
        })
        .collect();
    let columns = CatalogColumns {
        titles: Some(titles),
        ..Default::default()
    };
    let catalog = Catalog::new(ids, embeddings, columns).expect("catalog");
    let context =
        Arc::new(ScoringContext::new(catalog, BayesianConfig::default()).expect("context"));
    let selector = DiversitySelector::new(context)
        .with_validity(TitlePatterns::promotional().expect("patterns"));

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&DiversityRequest::for_item(SEED), &mut rng)
            .expect("pick");
        assert!(!pick.title.as_deref().unwrap_or_default().ends_with("s Rewind"));
    }

    let related = selector.related_with_rng(Some(SEED), None, 10, &mut StdRng::seed_from_u64(0));
    assert!(!related.is_empty());
    assert!(related.len() <= 10);
    assert!(
        related
            .iter()
            .all(|p| p.title.as_deref().is_some_and(|t| t.starts_with("Title ")))
    );
}

#[test]
fn test_related_huge_limit_returns_whole_catalog() {
    let selector = selector();
    let related =
        selector.related_with_rng(Some(SEED), None, usize::MAX / 2, &mut StdRng::seed_from_u64(0));

    assert_eq!(related.len(), ITEMS - 1);
    assert!(related.iter().all(|p| p.item_id != SEED));
    assert!(related.iter().all(|p| !p.is_fallback()));
}

/// Similarity scorer that always fails.
struct UnavailableSimilarity;

impl Scorer for UnavailableSimilarity {
    fn score(&self, _interactions: &[f64]) -> Result<ScoreVector, ScoringError> {
        Err(ScoringError::ComputationFailed {
            reason: "similarity index offline".to_string(),
        })
    }

    fn mask_value(&self) -> f64 {
        f64::NEG_INFINITY
    }
}

#[test]
fn test_similarity_failure_still_selects_from_pool() {
    let selector = selector().with_similarity(UnavailableSimilarity);
    let request = DiversityRequest::for_item(SEED).with_level(1);

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector
            .select_with_rng(&request, &mut rng)
            .expect("pick");
        let (position, start, end) = ranked_window(&pick);
        // Nothing is filtered as too similar, so the pool keeps all 149 candidates.
        assert_eq!((start, end), (10, 45));
        assert!((start..end).contains(&position));
        assert_ne!(pick.item_id, SEED);
    }
}

#[test]
fn test_similarity_failure_related_uses_fallback() {
    let selector = selector().with_similarity(UnavailableSimilarity);
    let related = selector.related_with_rng(Some(SEED), None, 3, &mut StdRng::seed_from_u64(4));

    assert_eq!(related.len(), 3);
    assert!(related.iter().all(DiversityPick::is_fallback));
}

#[test]
fn test_fallback_item_ids_are_slugs() {
    let item = FallbackItem::from_title("Blade Runner 2049");
    assert_eq!(item.item_id, "mock-blade-runner-2049");
    assert_eq!(item.title, "Blade Runner 2049");
}

#[test]
fn test_pick_serializes_origin() {
    let selector = selector();
    let pick = selector
        .select_with_rng(&DiversityRequest::for_item(SEED), &mut StdRng::seed_from_u64(2))
        .expect("pick");
    let json = serde_json::to_value(&pick).expect("json");

    assert_eq!(json["origin"]["kind"], "ranked");
    assert_eq!(json["origin"]["window_start"], 10);
    assert!(json["title"].is_string());
}
