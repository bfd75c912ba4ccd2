use crate::dsl::ValidationError;
use ctxnav_core::error::{CtxnavError, ErrorCode};
use storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid navigation options: {0}")]
    InvalidOptions(#[from] ValidationError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("context not found: {0}")]
    ContextNotFound(String),
    #[error("query deadline exceeded")]
    DeadlineExceeded,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("link {link_id} references missing context {context_id}")]
    DanglingLink { link_id: String, context_id: String },
}

impl CtxnavError for NavigationError {
    fn error_code(&self) -> ErrorCode {
        match self {
            NavigationError::InvalidOptions(_) | NavigationError::InvalidRequest(_) => {
                ErrorCode::InvalidArgument
            }
            NavigationError::ContextNotFound(_) => ErrorCode::NotFound,
            NavigationError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            NavigationError::Store(err) => err.error_code(),
            NavigationError::DanglingLink { .. } => ErrorCode::Internal,
        }
    }
}
