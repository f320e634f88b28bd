use clerk_store::StoreError;

/// Errors produced by keeper operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClerkError {
    #[error("unknown root chain type: {0}")]
    UnknownRootChain(String),

    #[error("root chain event already ingested: {chain}:{origin_id}")]
    DuplicateRootChainEvent { chain: String, origin_id: u64 },

    #[error("key already exists: {0}")]
    KeyExists(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("latest id cannot move backwards: current {current}, requested {requested}")]
    CounterRegression { current: u64, requested: u64 },

    #[error("canonical id space exhausted")]
    IdExhausted,

    #[error("genesis record {expected} was re-ingested as {assigned}")]
    GenesisMismatch { expected: u64, assigned: u64 },

    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl ClerkError {
    /// Returns `true` for write-once violations: the submission was already
    /// ingested. Replays and relayer retries end here; it is not a fault.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRootChainEvent { .. } | Self::KeyExists(_)
        )
    }
}

impl From<StoreError> for ClerkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::KeyExists { key } => Self::KeyExists(key),
            other => Self::Store(other),
        }
    }
}

/// Result alias for keeper operations.
pub type ClerkResult<T> = Result<T, ClerkError>;
