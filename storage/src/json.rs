use crate::store::{ContextStore, LinkStore, StoreError};
use async_trait::async_trait;
use ctxnav_core::model::{Context, Link};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// File-backed store: a JSON array of contexts and a JSON array of links.
///
/// Contexts are loaded when the store is opened; the links file is re-read
/// on every `all_links` call so each query sees the current link set.
pub struct JsonFileStore {
    contexts: DashMap<String, Context>,
    contexts_path: PathBuf,
    links_path: PathBuf,
}

impl JsonFileStore {
    pub async fn open(
        contexts_path: impl AsRef<Path>,
        links_path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let store = Self {
            contexts: DashMap::new(),
            contexts_path: contexts_path.as_ref().to_path_buf(),
            links_path: links_path.as_ref().to_path_buf(),
        };
        store.reload_contexts().await?;
        Ok(store)
    }

    /// Replace the cached contexts with the current file content.
    pub async fn reload_contexts(&self) -> Result<usize, StoreError> {
        let contexts: Vec<Context> = read_json_array(&self.contexts_path).await?;
        self.contexts.clear();
        for context in contexts {
            self.contexts.insert(context.id.clone(), context);
        }
        debug!(
            "Loaded {} contexts from {}",
            self.contexts.len(),
            self.contexts_path.display()
        );
        Ok(self.contexts.len())
    }
}

/// A missing file reads as an empty array; anything unparsable is an error.
async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("Store file {} not found, treating as empty", path.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[async_trait]
impl ContextStore for JsonFileStore {
    async fn get_context(&self, id: &str) -> Result<Option<Context>, StoreError> {
        Ok(self.contexts.get(id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl LinkStore for JsonFileStore {
    async fn all_links(&self) -> Result<Vec<Link>, StoreError> {
        read_json_array(&self.links_path).await
    }
}
