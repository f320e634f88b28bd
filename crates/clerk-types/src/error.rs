use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("empty root chain tag")]
    EmptyChainTag,

    #[error("empty sequence token")]
    EmptySequenceToken,

    #[error("log index {log_index} does not fit the log index unit {unit}")]
    LogIndexOverflow { log_index: u64, unit: u64 },
}
