use clerk_types::RootChainType;
use serde::{Deserialize, Serialize};

/// Read-only lookup of the root chains the keeper accepts events from.
pub trait RootChainRegistry {
    fn is_recognized(&self, chain: &RootChainType) -> bool;
}

impl<T: RootChainRegistry + ?Sized> RootChainRegistry for &T {
    fn is_recognized(&self, chain: &RootChainType) -> bool {
        (**self).is_recognized(chain)
    }
}

/// Chain parameters supplied by the parameter subsystem.
///
/// A chain is recognized only if it is listed here *and* is a known
/// [`RootChainType`]: listing an unknown tag never gives it index families.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    #[serde(default = "default_root_chains")]
    pub root_chains: Vec<RootChainType>,
}

fn default_root_chains() -> Vec<RootChainType> {
    RootChainType::KNOWN.to_vec()
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            root_chains: default_root_chains(),
        }
    }
}

impl ChainParams {
    pub fn new(root_chains: Vec<RootChainType>) -> Self {
        Self { root_chains }
    }
}

impl RootChainRegistry for ChainParams {
    fn is_recognized(&self, chain: &RootChainType) -> bool {
        chain.is_known() && self.root_chains.contains(chain)
    }
}
