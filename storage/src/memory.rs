use crate::store::{ContextStore, LinkStore, StoreError};
use async_trait::async_trait;
use ctxnav_core::model::{Context, Link};
use dashmap::DashMap;
use tokio::sync::RwLock;

/// In-memory store backing both collaborator contracts.
///
/// Links are returned in insertion order, which keeps traversal tie-breaks
/// reproducible across runs.
#[derive(Default)]
pub struct MemoryStore {
    contexts: DashMap<String, Context>,
    links: RwLock<Vec<Link>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_context(&self, context: Context) {
        self.contexts.insert(context.id.clone(), context);
    }

    /// Insert or replace a link, keeping the original position on replace.
    pub async fn put_link(&self, link: Link) {
        let mut links = self.links.write().await;
        match links.iter_mut().find(|existing| existing.id == link.id) {
            Some(existing) => *existing = link,
            None => links.push(link),
        }
    }
}

#[async_trait]
impl ContextStore for MemoryStore {
    async fn get_context(&self, id: &str) -> Result<Option<Context>, StoreError> {
        Ok(self.contexts.get(id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn all_links(&self) -> Result<Vec<Link>, StoreError> {
        Ok(self.links.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_link_replaces_in_place() {
        let store = MemoryStore::new();
        store.put_link(Link::new("l1", "a", "b", "supports")).await;
        store.put_link(Link::new("l2", "b", "c", "supports")).await;
        store
            .put_link(Link::new("l1", "a", "b", "explains").with_strength(0.5))
            .await;

        let links = store.all_links().await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, "l1");
        assert_eq!(links[0].relation, "explains");
        assert_eq!(links[1].id, "l2");
    }

    #[tokio::test]
    async fn get_context_returns_none_for_unknown_id() {
        let store = MemoryStore::new();
        store.put_context(Context::new("ctx-1", "hello"));

        assert!(store.get_context("ctx-1").await.unwrap().is_some());
        assert!(store.get_context("ctx-9").await.unwrap().is_none());
    }
}
