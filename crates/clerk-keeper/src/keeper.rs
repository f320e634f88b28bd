use clerk_store::KvStore;

use crate::params::{ChainParams, RootChainRegistry};

/// The clerk keeper.
///
/// Sole writer of its portion of the store. `S` is whatever store the
/// enclosing execution context hands out for the current transaction,
/// typically a [`clerk_store::CacheKvStore`] that is committed or discarded
/// as a unit, or a [`clerk_store::ReadOnlyStore`] for queries.
pub struct ClerkKeeper<S, P = ChainParams> {
    pub(crate) store: S,
    pub(crate) params: P,
}

impl<S: KvStore, P: RootChainRegistry> ClerkKeeper<S, P> {
    pub fn new(store: S, params: P) -> Self {
        Self { store, params }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: KvStore> ClerkKeeper<S> {
    /// Keeper accepting every known root chain.
    pub fn with_default_params(store: S) -> Self {
        Self::new(store, ChainParams::default())
    }
}

impl<S, P: std::fmt::Debug> std::fmt::Debug for ClerkKeeper<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkKeeper")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
