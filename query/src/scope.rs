use crate::error::NavigationError;
use ctxnav_core::model::{Context, Link};
use std::collections::HashMap;
use std::future::Future;
use storage::{ContextStore, LinkStore, StoreError};
use tokio::time::Instant;

/// Per-query view of the stores.
///
/// Every store call is bounded by the query deadline, and contexts are cached
/// for the lifetime of the query only.
pub(crate) struct QueryScope<'s> {
    contexts: &'s dyn ContextStore,
    links: &'s dyn LinkStore,
    deadline: Option<Instant>,
    cache: HashMap<String, Option<Context>>,
}

impl<'s> QueryScope<'s> {
    pub fn new(
        contexts: &'s dyn ContextStore,
        links: &'s dyn LinkStore,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            contexts,
            links,
            deadline,
            cache: HashMap::new(),
        }
    }

    async fn guard<T, F>(&self, call: F) -> Result<T, NavigationError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| NavigationError::DeadlineExceeded)?
                .map_err(NavigationError::from),
            None => call.await.map_err(NavigationError::from),
        }
    }

    /// Resolve a context, consulting the store at most once per ID.
    pub async fn context(&mut self, id: &str) -> Result<Option<Context>, NavigationError> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(cached.clone());
        }
        let contexts = self.contexts;
        let fetched = self.guard(contexts.get_context(id)).await?;
        self.cache.insert(id.to_string(), fetched.clone());
        Ok(fetched)
    }

    pub async fn require(&mut self, id: &str) -> Result<Context, NavigationError> {
        self.context(id)
            .await?
            .ok_or_else(|| NavigationError::ContextNotFound(id.to_string()))
    }

    /// One immutable link snapshot for the whole query.
    pub async fn link_snapshot(&self) -> Result<Vec<Link>, NavigationError> {
        self.guard(self.links.all_links()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::MemoryStore;

    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContextStore for CountingStore {
        async fn get_context(&self, id: &str) -> Result<Option<Context>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_context(id).await
        }
    }

    #[tokio::test]
    async fn contexts_are_fetched_once_per_query() {
        let inner = MemoryStore::new();
        inner.put_context(Context::new("a", "alpha"));
        let store = CountingStore {
            inner,
            calls: AtomicUsize::new(0),
        };
        let links = MemoryStore::new();

        let mut scope = QueryScope::new(&store, &links, None);
        assert_eq!(scope.require("a").await.unwrap().text, "alpha");
        assert_eq!(scope.require("a").await.unwrap().text, "alpha");
        assert!(scope.context("missing").await.unwrap().is_none());
        assert!(scope.context("missing").await.unwrap().is_none());
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn require_reports_missing_id() {
        let store = MemoryStore::new();
        let mut scope = QueryScope::new(&store, &store, None);
        match scope.require("ghost").await {
            Err(NavigationError::ContextNotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
