//! Cache backends for reqtap.
//!
//! This crate provides the storage side of the opt-in response cache. It
//! offers a trait-based API with pluggable backends; expiry bookkeeping is
//! entirely the backend's responsibility, so callers never re-derive
//! freshness from timestamps.
//!
//! Currently supported backends:
//! - in-memory (always available)
//! - fjall, disk-backed (with the "fjall" feature, on by default)

mod entry;
mod error;
#[cfg(feature = "fjall")]
mod fjall;
mod memory;
mod store;

pub use crate::entry::CacheEntry;
pub use crate::error::CacheError;
#[cfg(feature = "fjall")]
pub use crate::fjall::FjallCacheStore;
pub use crate::memory::InMemoryCacheStore;
pub use crate::store::{CacheStore, SharedCacheStore};
