//! The capability interface every cache backend implements.
//!
//! The interceptor side only ever talks to this trait; which backend sits
//! behind it is the owning pipeline's decision.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::CacheError;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an entry. Returns `None` for missing and expired keys alike;
    /// expiry is tracked here, never by the caller.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Insert or overwrite an entry with the given time-to-live. Concurrent
    /// writes to the same key resolve last-write-wins.
    async fn put(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Remove a single entry. `NotFound` if the key is absent.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Drop every entry.
    async fn clear(&self) -> Result<(), CacheError>;
}

pub type SharedCacheStore = Arc<dyn CacheStore + Send + Sync>;
