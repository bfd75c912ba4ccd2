use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ctxnav_core::error::{CtxnavError, ErrorCode};
use ctxnav_core::model::{Context, Link};
use query::{NavigationEngine, NavigationError, NavigationOptions, Projection};
use storage::{ContextStore, LinkStore, MemoryStore, StoreError};

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.put_context(Context::new("ctx-1", "one"));
    store.put_context(Context::new("ctx-2", "two"));
    store.put_context(Context::new("ctx-3", "three"));
    store
        .put_link(
            Link::new("link-1", "ctx-1", "ctx-2", "related")
                .with_strength(0.8)
                .with_confidence(0.9),
        )
        .await;
    store
}

/// Link store that takes far longer than any query deadline.
struct SlowLinks;

#[async_trait]
impl LinkStore for SlowLinks {
    async fn all_links(&self) -> Result<Vec<Link>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

struct DownLinks;

#[async_trait]
impl LinkStore for DownLinks {
    async fn all_links(&self) -> Result<Vec<Link>, StoreError> {
        Err(StoreError::Unavailable("link backend offline".into()))
    }
}

#[tokio::test]
async fn test_error_mapping_standard_categories() {
    let engine = NavigationEngine::from_store(seeded_store().await);

    // INVALID_ARGUMENT: malformed JSON
    let response = engine.execute_json("{not json").await;
    assert!(!response.success);
    assert_eq!(response.error_code, Some(ErrorCode::InvalidArgument));
    assert!(response.error.unwrap().contains("invalid request"));

    // INVALID_ARGUMENT: options out of range
    let response = engine
        .execute_json(r#"{"startId":"ctx-1","mode":"exploratory","strategy":{"maxSteps":101}}"#)
        .await;
    assert_eq!(response.error_code, Some(ErrorCode::InvalidArgument));
    assert!(response.error.unwrap().contains("maxSteps"));

    // INVALID_ARGUMENT: point-to-point mode without target
    let response = engine
        .execute_json(r#"{"startId":"ctx-1","mode":"shortest"}"#)
        .await;
    assert_eq!(response.error_code, Some(ErrorCode::InvalidArgument));
    assert!(response
        .error
        .unwrap()
        .contains("mode 'shortest' requires targetId"));

    // NOT_FOUND
    let response = engine
        .execute_json(r#"{"startId":"ctx-999","targetId":"ctx-1"}"#)
        .await;
    assert_eq!(response.error_code, Some(ErrorCode::NotFound));
    assert!(response.error.unwrap().contains("ctx-999"));

    let snapshot = engine.metrics();
    // rejected requests never reach an algorithm
    assert_eq!(snapshot.total_queries, 1);
    assert_eq!(snapshot.failures, 1);
}

#[tokio::test]
async fn test_response_shapes() {
    let engine = NavigationEngine::from_store(seeded_store().await);

    let found = engine
        .execute_json(r#"{"startId":"ctx-1","targetId":"ctx-2","includeContent":true}"#)
        .await;
    let json = serde_json::to_value(&found).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["path"]["nodes"][0]["text"], "one");
    assert!(json["path"]["nodes"][0].get("tags").is_none());
    assert!(json["path"]["edges"][0].get("strength").is_none());
    assert!(json.get("error").is_none());

    let no_path = engine
        .execute_json(r#"{"startId":"ctx-2","targetId":"ctx-3","mode":"shortest"}"#)
        .await;
    let json = serde_json::to_value(&no_path).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "success": false,
            "error": "no path found between ctx-2 and ctx-3"
        })
    );

    let not_found = engine
        .execute_json(r#"{"startId":"ctx-404","mode":"exploratory"}"#)
        .await;
    let json = serde_json::to_value(&not_found).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["errorCode"], "NOT_FOUND");
    assert!(json.get("path").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded_on_slow_store() {
    let contexts: Arc<dyn ContextStore> = seeded_store().await;
    let engine = NavigationEngine::new(contexts, Arc::new(SlowLinks))
        .with_query_timeout(Duration::from_millis(50));

    let err = engine
        .weighted_path(
            "ctx-1",
            "ctx-2",
            &NavigationOptions::default(),
            Projection::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NavigationError::DeadlineExceeded));
    assert_eq!(err.error_code(), ErrorCode::DeadlineExceeded);
    assert_eq!(err.to_response().error_code, Some(ErrorCode::DeadlineExceeded));
}

#[tokio::test]
async fn test_store_failures_surface_as_unavailable() {
    let contexts: Arc<dyn ContextStore> = seeded_store().await;
    let engine = NavigationEngine::new(contexts, Arc::new(DownLinks));

    let response = engine
        .execute_json(r#"{"startId":"ctx-1","mode":"exploratory"}"#)
        .await;
    assert!(!response.success);
    assert_eq!(response.error_code, Some(ErrorCode::Unavailable));
    assert!(response.error.unwrap().contains("link backend offline"));
}
