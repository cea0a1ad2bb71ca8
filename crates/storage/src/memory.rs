//! In-memory object store used by tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{ObjectStore, StorageError};

/// BTreeMap-backed store. Listing is in key order, like S3.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    fail_listing: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `list_keys` calls fail, for exercising error paths.
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StorageError::Provider("injected listing failure".into()));
        }
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_roundtrip_and_missing_key() {
        let store = MemoryObjectStore::new();
        store.put("a/1/x.txt", b"hello".to_vec()).await.unwrap();

        assert_eq!(store.get("a/1/x.txt").await.unwrap(), b"hello");
        assert!(matches!(
            store.get("a/1/missing.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_scoped_to_prefix() {
        let store = MemoryObjectStore::new();
        store.put("a/1/x.txt", vec![]).await.unwrap();
        store.put("a/1/y.txt", vec![]).await.unwrap();
        store.put("a/2/z.txt", vec![]).await.unwrap();

        assert_eq!(
            store.list_keys("a/1/").await.unwrap(),
            vec!["a/1/x.txt", "a/1/y.txt"]
        );
    }

    #[tokio::test]
    async fn delete_prefix_removes_everything_under_it() {
        let store = MemoryObjectStore::new();
        store.put("a/1/x.txt", vec![]).await.unwrap();
        store.put("a/1/y.txt", vec![]).await.unwrap();
        store.put("a/2/z.txt", vec![]).await.unwrap();

        assert_eq!(store.delete_prefix("a/1/").await.unwrap(), 2);
        assert_eq!(store.len().await, 1);
    }
}
