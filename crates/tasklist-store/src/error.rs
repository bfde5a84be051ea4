//! Error types for tasklist store operations.

use thiserror::Error;

/// Result alias for key-value store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing persisted tasks.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Stored value is not a task list, or the list could not be encoded.
    #[error("Failed to encode or decode tasks: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
