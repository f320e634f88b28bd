use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::memory::range_bounds;
use crate::traits::{KvPair, KvStore};

/// Buffered write overlay over a parent store.
///
/// Models the all-or-nothing boundary of one state transition: reads see
/// the parent merged with the buffered writes, writes stay in the buffer
/// until [`CacheKvStore::commit`], and dropping the overlay discards them.
/// Nothing reaches the parent unless the whole transition succeeded.
pub struct CacheKvStore<'a, S: KvStore + ?Sized> {
    parent: &'a S,
    writes: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> CacheKvStore<'a, S> {
    pub fn new(parent: &'a S) -> Self {
        Self {
            parent,
            writes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of buffered writes.
    pub fn pending(&self) -> StoreResult<usize> {
        Ok(self.read_guard()?.len())
    }

    /// Flush every buffered write to the parent in a single batch.
    ///
    /// Returns the number of keys written.
    pub fn commit(self) -> StoreResult<usize> {
        let writes = self
            .writes
            .into_inner()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let count = writes.len();
        self.parent.write_batch(writes.into_iter().collect())?;
        debug!(keys = count, "committed cached writes");
        Ok(count)
    }

    /// Drop every buffered write.
    pub fn discard(self) {
        let count = self.pending().unwrap_or_default();
        debug!(keys = count, "discarded cached writes");
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.writes
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_guard(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.writes
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl<S: KvStore + ?Sized> KvStore for CacheKvStore<'_, S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        if let Some(value) = self.read_guard()?.get(key) {
            return Ok(Some(value.clone()));
        }
        self.parent.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.write_guard()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn iter_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        let Some(bounds) = range_bounds(start, end) else {
            return Ok(vec![]);
        };
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iter_range(start, end)?.into_iter().collect();
        let writes = self.read_guard()?;
        for (k, v) in writes.range::<[u8], _>(bounds) {
            merged.insert(k.clone(), v.clone());
        }
        Ok(merged.into_iter().collect())
    }
}

impl<S: KvStore + ?Sized> std::fmt::Debug for CacheKvStore<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheKvStore")
            .field("pending", &self.pending().unwrap_or_default())
            .finish()
    }
}
