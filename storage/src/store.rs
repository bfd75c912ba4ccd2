use async_trait::async_trait;
use ctxnav_core::error::{CtxnavError, ErrorCode};
use ctxnav_core::model::{Context, Link};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store data in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl CtxnavError for StoreError {
    fn error_code(&self) -> ErrorCode {
        match self {
            StoreError::Io(_) => ErrorCode::Internal,
            StoreError::Parse { .. } => ErrorCode::Internal,
            StoreError::Unavailable(_) => ErrorCode::Unavailable,
        }
    }
}

/// Resolves a context ID to its payload.
///
/// Lookups must be idempotent and free of side effects visible to callers.
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn get_context(&self, id: &str) -> Result<Option<Context>, StoreError>;
}

/// Returns the complete, current set of relationship links.
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn all_links(&self) -> Result<Vec<Link>, StoreError>;
}
