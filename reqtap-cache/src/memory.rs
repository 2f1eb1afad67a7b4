//! In-memory implementation of the `CacheStore` trait. Entries live in a
//! mutexed map and expired keys are dropped lazily on lookup.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;

use crate::{CacheEntry, CacheError, CacheStore};

#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        entries
            .remove(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        entries.clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock().unwrap();
        f.debug_struct("InMemoryCacheStore")
            .field("entries", &entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryCacheStore::new();
        store
            .put("key", "value", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("value".to_string()));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = InMemoryCacheStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_is_none() {
        let store = InMemoryCacheStore::new();
        store
            .put("key", "value", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_existing_entry() {
        let store = InMemoryCacheStore::new();
        store
            .put("key", "first", Duration::from_secs(60))
            .await
            .unwrap();
        store
            .put("key", "second", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn remove_existing_entry() {
        let store = InMemoryCacheStore::new();
        store
            .put("key", "value", Duration::from_secs(60))
            .await
            .unwrap();
        store.remove("key").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_missing_key_is_not_found() {
        let store = InMemoryCacheStore::new();
        match store.remove("missing").await {
            Err(CacheError::NotFound(_)) => (),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn clear_drops_all_entries() {
        let store = InMemoryCacheStore::new();
        store
            .put("one", "1", Duration::from_secs(60))
            .await
            .unwrap();
        store
            .put("two", "2", Duration::from_secs(60))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.get("one").await.unwrap(), None);
        assert_eq!(store.get("two").await.unwrap(), None);
    }
}
