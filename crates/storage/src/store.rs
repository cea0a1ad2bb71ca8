//! Provider-independent object store interface.

use async_trait::async_trait;

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object exists at the given key.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// A stored document failed to deserialize.
    #[error("Invalid document at {key}: {message}")]
    InvalidDocument { key: String, message: String },

    /// Listing is suppressed until the current backoff window closes.
    #[error("Storage listing backed off, retry in {retry_in_ms}ms")]
    BackedOff { retry_in_ms: u64 },

    /// Any provider-side failure (network, auth, throttling).
    #[error("Storage provider error: {0}")]
    Provider(String),
}

/// Minimal object-store surface the backend needs.
///
/// Implementations must be cheap to share behind an `Arc` across handlers
/// and background tasks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every key under `prefix`.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Fetch an object's full contents.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write an object, replacing any existing one.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError>;

    /// Delete a single object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every object under `prefix`, returning how many went away.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64, StorageError> {
        let keys = self.list_keys(prefix).await?;
        let count = keys.len() as u64;
        for key in keys {
            self.delete(&key).await?;
        }
        Ok(count)
    }
}
