//! Lock store error types.

use thiserror::Error;

/// Result type for lock store operations.
pub type LockStoreResult<T> = Result<T, LockStoreError>;

/// Errors that can occur while talking to the lock store.
#[derive(Debug, Error)]
pub enum LockStoreError {
    #[error("Lock store configuration error: {0}")]
    Config(String),

    #[error("Lock record not found: {0}")]
    NotFound(String),

    #[error("Lock store request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl LockStoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}
