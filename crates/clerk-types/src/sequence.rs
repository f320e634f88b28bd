use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chain::RootChainType;
use crate::error::TypeError;

/// Multiplier separating block numbers from log indexes in a sequence.
pub const DEFAULT_LOG_INDEX_UNIT: u64 = 100_000;

/// Relayer idempotency token.
///
/// Opaque to the keeper: presence in the sequence ledger means the
/// submission was already processed. [`SequenceToken::from_log_position`]
/// derives the canonical token for a root-chain log so that every relayer
/// submitting the same log produces the same token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceToken(String);

impl SequenceToken {
    /// Wrap an arbitrary non-empty token.
    pub fn new(token: impl Into<String>) -> Result<Self, TypeError> {
        let token = token.into();
        if token.is_empty() {
            return Err(TypeError::EmptySequenceToken);
        }
        Ok(Self(token))
    }

    /// `"<chain>:<block_number * unit + log_index>"`.
    pub fn from_log_position(
        chain: &RootChainType,
        block_number: u64,
        log_index: u64,
    ) -> Result<Self, TypeError> {
        if log_index >= DEFAULT_LOG_INDEX_UNIT {
            return Err(TypeError::LogIndexOverflow {
                log_index,
                unit: DEFAULT_LOG_INDEX_UNIT,
            });
        }
        let position =
            u128::from(block_number) * u128::from(DEFAULT_LOG_INDEX_UNIT) + u128::from(log_index);
        Ok(Self(format!("{chain}:{position}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SequenceToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
