use std::{path::Path, sync::Mutex, time::Duration};

use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use tracing::debug;

use crate::{CacheEntry, CacheError, CacheStore};

/// Fjall-backed persistent cache store (default backend).
///
/// Layout:
/// - `entries`: cache key -> JSON-serialized `CacheEntry`
///
/// Expired entries are dropped lazily on lookup.
pub struct FjallCacheStore {
    db: Keyspace,
    entries: PartitionHandle,
    // Serialize get/put/remove/clear to keep ordering simple.
    lock: Mutex<()>,
}

impl FjallCacheStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let keyspace = Config::new(path).open()?;
        let entries = keyspace
            .open_partition("entries", PartitionCreateOptions::default())?;

        Ok(Self {
            db: keyspace,
            entries,
            lock: Mutex::new(()),
        })
    }

    fn encode(entry: &CacheEntry) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(entry)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<CacheEntry, CacheError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for FjallCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        let Some(bytes) = self.entries.get(key)? else {
            return Ok(None);
        };
        let entry = Self::decode(&bytes)?;
        if entry.is_expired() {
            self.entries.remove(key)?;
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    async fn put(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        let entry = CacheEntry::new(value, ttl);
        self.entries.insert(key, Self::encode(&entry)?)?;

        // Best-effort sync to disk for durability.
        self.db.persist(PersistMode::SyncAll)?;
        debug!("stored cache entry for key: {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        if self.entries.get(key)?.is_none() {
            return Err(CacheError::NotFound(key.to_string()));
        }
        self.entries.remove(key)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        let keys = self
            .entries
            .iter()
            .map(|kv| kv.map(|(key, _)| key))
            .collect::<Result<Vec<_>, _>>()?;
        for key in keys {
            self.entries.remove(key)?;
        }
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl std::fmt::Debug for FjallCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FjallCacheStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_store() -> (tempfile::TempDir, FjallCacheStore) {
        let dir = tempdir().unwrap();
        let store = FjallCacheStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_and_get() -> Result<(), CacheError> {
        let (_dir, store) = make_store();
        store.put("key", "value", Duration::from_secs(60)).await?;
        assert_eq!(store.get("key").await?, Some("value".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn missing_key_is_none() -> Result<(), CacheError> {
        let (_dir, store) = make_store();
        assert_eq!(store.get("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn expired_entry_is_none() -> Result<(), CacheError> {
        let (_dir, store) = make_store();
        store.put("key", "value", Duration::from_millis(10)).await?;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("key").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn remove_missing_key_is_not_found() {
        let (_dir, store) = make_store();
        let res = store.remove("missing").await;
        assert!(matches!(res, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn clear_drops_all_entries() -> Result<(), CacheError> {
        let (_dir, store) = make_store();
        store.put("one", "1", Duration::from_secs(60)).await?;
        store.put("two", "2", Duration::from_secs(60)).await?;
        store.clear().await?;
        assert_eq!(store.get("one").await?, None);
        assert_eq!(store.get("two").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn entries_survive_reopen() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        {
            let store = FjallCacheStore::open(dir.path())?;
            store.put("key", "value", Duration::from_secs(60)).await?;
        }
        let reopened = FjallCacheStore::open(dir.path())?;
        assert_eq!(reopened.get("key").await?, Some("value".to_string()));
        Ok(())
    }
}
