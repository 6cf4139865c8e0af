//! Cache error types.

use thiserror::Error;

/// Errors that can occur when reading or writing a storage slot.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Stored bytes were not valid UTF-8 text.
    #[error("Slot {0} does not hold text")]
    NotText(String),

    /// Writing would exceed the store's capacity.
    #[error("Quota exceeded writing {key}: {size} bytes (limit {limit})")]
    QuotaExceeded { key: String, size: usize, limit: usize },
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::StoreError(e.to_string())
    }
}
