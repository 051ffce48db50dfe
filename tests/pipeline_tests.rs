//! End-to-end tests: load a JSON-lines catalog, score, rank and pick.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

use ff1000::{
    BayesianConfig, CatalogError, CatalogLoader, DiversityRequest, DiversitySelector,
    JsonLinesLoader, Model, ScoringContext,
};

const ITEMS: usize = 30;

fn write_catalog() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    for i in 0..ITEMS {
        let mut record = serde_json::json!({
            "item_id": format!("item-{i}"),
            "title": format!("Movie {i}"),
            "embedding": [
                1.0 + (i % 5) as f64,
                (i % 3) as f64,
                ((i * 7) % 11) as f64 * 0.1,
                0.5,
            ],
        });
        if i % 2 == 0 {
            record["poster"] = serde_json::json!(format!("https://img.example/{i}.jpg"));
            record["premiere_year"] = serde_json::json!(1990 + i as i32);
        }
        writeln!(file, "{record}").expect("write record");
    }
    file.flush().expect("flush");
    file
}

fn load_context(file: &NamedTempFile) -> Arc<ScoringContext> {
    let catalog = JsonLinesLoader::new(file.path())
        .with_expected_dim(Some(4))
        .load()
        .expect("catalog");
    Arc::new(ScoringContext::new(catalog, BayesianConfig::default()).expect("context"))
}

#[test]
fn test_loaded_catalog_shape() {
    let file = write_catalog();
    let context = load_context(&file);
    let catalog = context.catalog();

    assert_eq!(catalog.len(), ITEMS);
    assert_eq!(catalog.dim(), 4);
    assert_eq!(catalog.title(7), Some("Movie 7"));
    assert_eq!(catalog.poster(0), Some("https://img.example/0.jpg"));
    assert_eq!(catalog.poster(1), None);
    assert_eq!(catalog.premiere_year(2), Some(1992));
}

#[test]
fn test_expected_dimension_mismatch_fails_load() {
    let file = write_catalog();
    let result = JsonLinesLoader::new(file.path())
        .with_expected_dim(Some(8))
        .load();

    assert!(matches!(result, Err(CatalogError::Dimension(_))));
}

#[test]
fn test_rfy_prediction_excludes_inputs_and_is_sorted() {
    let file = write_catalog();
    let context = load_context(&file);

    let ranked = context
        .predict(Model::Rfy, &["item-0", "item-1"], 5)
        .expect("predict");

    assert_eq!(ranked.len(), 5);
    assert!(
        ranked
            .iter()
            .all(|i| i.item_id != "item-0" && i.item_id != "item-1")
    );
    assert!(ranked.items().windows(2).all(|w| w[0].score >= w[1].score));

    let prediction = ranked.to_prediction();
    assert_eq!(prediction.item_ids.len(), 5);
    assert_eq!(prediction.premiere_years.len(), 5);
}

#[test]
fn test_polarity_flip_shares_uncertainty_term() {
    let file = write_catalog();
    let context = load_context(&file);
    let inputs = ["item-4", "item-9"];

    let rfy = context.export(Model::Rfy, &inputs).expect("rfy");
    let nfm = context.export(Model::NotForMe, &inputs).expect("nfm");

    // mean + zσ and -mean + zσ sum to 2zσ, which is never positive for z < 0.
    for (a, b) in rfy.scores.iter().zip(&nfm.scores) {
        if a.is_finite() && b.is_finite() {
            assert!(a + b <= 1e-9);
        }
    }
    assert!(rfy.scores[4].is_infinite());
    assert!(nfm.scores[9].is_infinite());
}

#[test]
fn test_similarity_ranks_every_other_item() {
    let file = write_catalog();
    let context = load_context(&file);

    let ranked = context
        .predict(Model::Similarity, &["item-3"], ITEMS)
        .expect("similarity");

    assert_eq!(ranked.len(), ITEMS - 1);
    assert!(ranked.iter().all(|i| i.score <= 1.0 + 1e-9));
    assert!(ranked.iter().all(|i| i.item_id != "item-3"));
}

#[test]
fn test_concurrent_predictions_match_sequential() {
    let file = write_catalog();
    let context = load_context(&file);
    let expected = context
        .predict(Model::Rfy, &["item-2"], 10)
        .expect("predict");

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let context = Arc::clone(&context);
                s.spawn(move || context.predict(Model::Rfy, &["item-2"], 10).expect("predict"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("thread"), expected);
        }
    });
}

#[test]
fn test_something_else_over_loaded_catalog() {
    let file = write_catalog();
    let context = load_context(&file);
    let selector = DiversitySelector::new(context);
    let request = DiversityRequest::for_item("item-5")
        .with_level(2)
        .excluding_items(["item-6", "item-7"]);

    for seed in 0..20 {
        let pick = selector
            .select_with_rng(&request, &mut StdRng::seed_from_u64(seed))
            .expect("pick");
        assert!(!pick.is_fallback());
        assert!(!["item-5", "item-6", "item-7"].contains(&pick.item_id.as_str()));
    }
}

#[test]
fn test_more_like_this_over_loaded_catalog() {
    let file = write_catalog();
    let context = load_context(&file);
    let nearest = context
        .predict(Model::Similarity, &["item-3"], 1)
        .expect("similarity");
    let selector = DiversitySelector::new(context);

    let related = selector.related_with_rng(
        Some("item-3"),
        Some("Movie 3"),
        3,
        &mut StdRng::seed_from_u64(0),
    );

    assert_eq!(related.len(), 3);
    assert_eq!(related[0].item_id, nearest.items()[0].item_id);
    assert!(related.iter().all(|p| p.item_id != "item-3"));
}
