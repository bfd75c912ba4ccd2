use std::sync::Arc;

use ctxnav_core::model::{Context, Link};
use query::{HybridParams, NavigationEngine, NavigationError, NavigationOptions, Projection};
use storage::MemoryStore;

async fn engine_with(ids: &[&str], links: Vec<Link>) -> NavigationEngine {
    let store = Arc::new(MemoryStore::new());
    for id in ids {
        store.put_context(Context::new(*id, format!("context {id}")));
    }
    for link in links {
        store.put_link(link).await;
    }
    NavigationEngine::from_store(store)
}

#[tokio::test]
async fn test_hybrid_passes_through_good_weighted_path() {
    let engine = engine_with(
        &["a", "b", "c"],
        vec![
            Link::new("ab", "a", "b", "supports")
                .with_strength(1.0)
                .with_confidence(0.9)
                .with_provenance("user"),
            Link::new("bc", "b", "c", "supports")
                .with_strength(0.9)
                .with_confidence(0.9),
        ],
    )
    .await;
    let options = NavigationOptions::default();

    let weighted = engine
        .weighted_path("a", "c", &options, Projection::full())
        .await
        .unwrap();
    let hybrid = engine
        .hybrid_path("a", "c", &options, &HybridParams::default(), Projection::full())
        .await
        .unwrap();

    assert_eq!(hybrid, weighted);
    assert_eq!(engine.metrics().hybrid_fallbacks, 0);
}

#[tokio::test]
async fn test_hybrid_falls_back_on_low_semantic_score() {
    let engine = engine_with(
        &["a", "b", "c", "d"],
        vec![
            Link::new("ab", "a", "b", "r")
                .with_strength(0.5)
                .with_confidence(0.5),
            Link::new("bc", "b", "c", "r")
                .with_strength(0.5)
                .with_confidence(0.5),
            Link::new("ad", "a", "d", "r")
                .with_strength(1.0)
                .with_confidence(0.9),
        ],
    )
    .await;

    let outcome = engine
        .hybrid_path(
            "a",
            "c",
            &NavigationOptions::default(),
            &HybridParams::default(),
            Projection::default(),
        )
        .await
        .unwrap();

    let path = outcome.path().unwrap();
    assert_eq!(path.node_ids(), vec!["a", "d", "b", "c"]);
    // only edges at or above the semantic threshold survive
    assert_eq!(path.edge_ids(), vec!["ad"]);

    let snapshot = engine.metrics();
    assert_eq!(snapshot.hybrid_fallbacks, 1);
    assert_eq!(snapshot.unreached_targets, 0);
    assert_eq!(snapshot.per_kind.hybrid, 1);
}

#[tokio::test]
async fn test_hybrid_fallback_is_best_effort_without_target() {
    let engine = engine_with(&["a", "b", "c"], vec![Link::new("ab", "a", "b", "r")]).await;

    let outcome = engine
        .hybrid_path(
            "a",
            "c",
            &NavigationOptions::default(),
            &HybridParams::default(),
            Projection::default(),
        )
        .await
        .unwrap();

    let path = outcome.path().unwrap();
    assert_eq!(path.node_ids(), vec!["a", "b"]);
    assert!(path.edges.is_empty());
    assert!(!path.contains_node("c"));
    assert_eq!(engine.metrics().unreached_targets, 1);
}

#[tokio::test]
async fn test_hybrid_fallback_uses_exploratory_step_limit() {
    let engine = engine_with(
        &["a", "b", "c", "z"],
        vec![
            Link::new("ab", "a", "b", "r"),
            Link::new("bc", "b", "c", "r"),
        ],
    )
    .await;
    let params = HybridParams {
        max_exploratory_steps: 1,
        ..Default::default()
    };

    let outcome = engine
        .hybrid_path("a", "z", &NavigationOptions::default(), &params, Projection::default())
        .await
        .unwrap();
    assert_eq!(outcome.path().unwrap().node_ids(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_hybrid_accepts_zero_edge_path() {
    let engine = engine_with(&["a"], vec![]).await;

    let outcome = engine
        .hybrid_path(
            "a",
            "a",
            &NavigationOptions::default(),
            &HybridParams::default(),
            Projection::default(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.path().unwrap().node_ids(), vec!["a"]);
    assert_eq!(engine.metrics().hybrid_fallbacks, 0);
}

#[tokio::test]
async fn test_hybrid_does_not_mask_not_found() {
    let engine = engine_with(&["a"], vec![]).await;

    let err = engine
        .hybrid_path(
            "a",
            "ghost",
            &NavigationOptions::default(),
            &HybridParams::default(),
            Projection::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NavigationError::ContextNotFound(id) if id == "ghost"));
    assert_eq!(engine.metrics().hybrid_fallbacks, 0);
}

#[tokio::test]
async fn test_hybrid_rejects_invalid_params() {
    let engine = engine_with(&["a", "b"], vec![]).await;
    let params = HybridParams {
        max_exploratory_steps: 0,
        ..Default::default()
    };

    let err = engine
        .hybrid_path("a", "b", &NavigationOptions::default(), &params, Projection::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NavigationError::InvalidOptions(_)));
}

#[tokio::test]
async fn test_hybrid_request_overrides_via_json() {
    let engine = engine_with(
        &["a", "b"],
        vec![Link::new("ab", "a", "b", "r")
            .with_strength(0.5)
            .with_confidence(0.5)],
    )
    .await;

    // mean hybrid score 0.25 passes once the minimum is lowered
    let response = engine
        .execute_json(
            r#"{"startId":"a","targetId":"b","mode":"hybrid","hybrid":{"minSemanticScore":0.2}}"#,
        )
        .await;
    assert!(response.success);
    assert_eq!(response.path.unwrap().edge_ids(), vec!["ab"]);
    assert_eq!(engine.metrics().hybrid_fallbacks, 0);
}
