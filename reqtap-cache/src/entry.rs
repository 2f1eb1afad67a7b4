use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single cached value together with its lifetime bookkeeping.
///
/// Entries are owned exclusively by the store that created them; the
/// serialized form on disk is the backend's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// The cached payload, a serialized response body.
    pub value: String,
    /// When this entry was written.
    pub created_at: DateTime<Utc>,
    /// When this entry stops being served.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: impl Into<String>, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = created_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            value: value.into(),
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_not_expired() {
        let entry = CacheEntry::new("payload", Duration::from_secs(60));
        assert!(!entry.is_expired());
        assert_eq!(entry.value, "payload");
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let entry = CacheEntry::new("payload", Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new("payload", Duration::from_secs(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn survives_json_roundtrip() {
        let entry = CacheEntry::new("payload", Duration::from_secs(60));
        let bytes = serde_json::to_vec(&entry).unwrap();
        let restored: CacheEntry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored, entry);
    }
}
