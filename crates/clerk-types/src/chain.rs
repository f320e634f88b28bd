use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A root chain whose events are bridged into the clerk.
///
/// The set is closed: every known chain has its own index families in the
/// store. Tags that do not name a known chain still parse, into
/// [`RootChainType::Unknown`], so that callers can carry them far enough to
/// be rejected with a typed error instead of silently producing no key.
///
/// Serialized as its textual tag (`"eth"`, `"tron"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RootChainType {
    /// Ethereum mainnet or a compatible L1.
    Eth,
    /// Tron.
    Tron,
    /// A tag that names no supported chain.
    Unknown(String),
}

impl RootChainType {
    /// Every supported chain, in tag order.
    pub const KNOWN: [RootChainType; 2] = [RootChainType::Eth, RootChainType::Tron];

    /// Textual tag for an Ethereum event.
    pub const ETH_TAG: &'static str = "eth";
    /// Textual tag for a Tron event.
    pub const TRON_TAG: &'static str = "tron";

    /// Map a textual tag to a chain. Never fails: unrecognized tags become
    /// [`RootChainType::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            Self::ETH_TAG => Self::Eth,
            Self::TRON_TAG => Self::Tron,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The textual tag of this chain.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eth => Self::ETH_TAG,
            Self::Tron => Self::TRON_TAG,
            Self::Unknown(tag) => tag,
        }
    }

    /// Returns `true` for every variant except [`RootChainType::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl FromStr for RootChainType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TypeError::EmptyChainTag);
        }
        Ok(Self::from_tag(s))
    }
}

impl From<String> for RootChainType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<RootChainType> for String {
    fn from(chain: RootChainType) -> Self {
        match chain {
            RootChainType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RootChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
