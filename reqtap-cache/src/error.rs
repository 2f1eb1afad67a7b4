use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache entry not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[cfg(feature = "fjall")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),
}

impl CacheError {
    /// True when a caller may safely treat the failure as a cache miss and
    /// serve the request live. `NotFound` is a contract violation by the
    /// caller, not a storage fault.
    pub fn is_transient(&self) -> bool {
        !matches!(self, CacheError::NotFound(_))
    }
}
