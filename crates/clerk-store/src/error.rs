/// Errors from key-value store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A write-once key is already present.
    #[error("key already exists: {key}")]
    KeyExists { key: String },

    /// The store or view does not accept writes.
    #[error("store is read-only")]
    ReadOnly,

    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// Failure reported by the underlying storage backend.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Build a [`StoreError::KeyExists`] for a raw key.
    pub fn key_exists(key: &[u8]) -> Self {
        Self::KeyExists {
            key: hex::encode(key),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
