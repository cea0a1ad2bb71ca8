//! Backoff-guarded listing.
//!
//! Wraps an [`ObjectStore`] so that listing failures open a suppression
//! window (see [`crate::backoff`]); calls arriving inside the window fail
//! fast with [`StorageError::BackedOff`] instead of hitting the provider.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::backoff::{Attempt, BackoffConfig, ListingBackoff};
use crate::store::{ObjectStore, StorageError};

/// Shared, backoff-guarded listing front for one object store.
pub struct BackoffLister {
    store: Arc<dyn ObjectStore>,
    backoff: Mutex<ListingBackoff>,
}

impl BackoffLister {
    pub fn new(store: Arc<dyn ObjectStore>, config: BackoffConfig) -> Self {
        Self {
            store,
            backoff: Mutex::new(ListingBackoff::new(config)),
        }
    }

    /// List keys under `prefix`, honouring any open backoff window.
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        {
            let backoff = self.backoff.lock().await;
            if let Attempt::Suppressed { retry_in } = backoff.check(Instant::now()) {
                return Err(StorageError::BackedOff {
                    retry_in_ms: retry_in.as_millis() as u64,
                });
            }
        }

        match self.store.list_keys(prefix).await {
            Ok(keys) => {
                self.backoff.lock().await.record_success();
                Ok(keys)
            }
            Err(e) => {
                let mut backoff = self.backoff.lock().await;
                backoff.record_failure(Instant::now());
                tracing::warn!(
                    prefix,
                    error = %e,
                    delay_ms = backoff.current_delay().map(|d| d.as_millis() as u64),
                    "Storage listing failed, backing off",
                );
                Err(e)
            }
        }
    }
}
