use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::pagination::Page;
use crate::traits::{KvPair, KvStore};

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and embedding. Entries live behind a `RwLock` so the
/// store can be shared across threads; values are cloned on read.
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_guard()?.len())
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_guard()?.is_empty())
    }

    /// Total bytes across all keys and values.
    pub fn total_bytes(&self) -> StoreResult<u64> {
        Ok(self
            .read_guard()?
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum())
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_guard(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds for a half-open `[start, end)` scan, or `None` if it is empty.
///
/// `BTreeMap::range` panics on inverted bounds, so they are filtered here.
pub(crate) fn range_bounds<'k>(
    start: &'k [u8],
    end: Option<&'k [u8]>,
) -> Option<(Bound<&'k [u8]>, Bound<&'k [u8]>)> {
    match end {
        Some(end) if start >= end => None,
        Some(end) => Some((Bound::Included(start), Bound::Excluded(end))),
        None => Some((Bound::Included(start), Bound::Unbounded)),
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_guard()?.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.write_guard()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.read_guard()?.contains_key(key))
    }

    // Checked and written under one lock so concurrent callers cannot both
    // observe the key as absent.
    fn set_once(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut map = self.write_guard()?;
        if map.contains_key(key) {
            return Err(StoreError::key_exists(key));
        }
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn iter_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        let Some(bounds) = range_bounds(start, end) else {
            return Ok(vec![]);
        };
        let map = self.read_guard()?;
        Ok(map
            .range::<[u8], _>(bounds)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn iter_range_page(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        page: Page,
    ) -> StoreResult<Vec<KvPair>> {
        let (Some(bounds), Some((skip, take))) = (range_bounds(start, end), page.window()) else {
            return Ok(vec![]);
        };
        let map = self.read_guard()?;
        Ok(map
            .range::<[u8], _>(bounds)
            .skip(skip)
            .take(take)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn write_batch(&self, batch: Vec<KvPair>) -> StoreResult<()> {
        let mut map = self.write_guard()?;
        map.extend(batch);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &count)
            .finish()
    }
}
