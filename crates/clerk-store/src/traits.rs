use crate::error::{StoreError, StoreResult};
use crate::pagination::Page;

/// A key and its value, as returned by iteration.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered key-value store keyed on raw byte strings.
///
/// All implementations must satisfy these invariants:
/// - Iteration yields keys in ascending lexicographic byte order.
/// - Range iteration is half-open: `start` included, `end` excluded.
/// - `set` overwrites; `set_once` never does.
/// - The store never interprets values.
pub trait KvStore: Send + Sync {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` at `key`, replacing any previous value.
    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Iterate `[start, end)` in key order. `None` leaves the range open
    /// above. An empty or inverted range yields nothing.
    fn iter_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>>;

    /// Check whether `key` is present.
    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Write-once primitive: store `value` at `key` unless the key is
    /// already present, in which case fail with [`StoreError::KeyExists`]
    /// and leave the stored value untouched.
    fn set_once(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        if self.has(key)? {
            return Err(StoreError::key_exists(key));
        }
        self.set(key, value)
    }

    /// Iterate every key starting with `prefix`.
    fn iter_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<KvPair>> {
        let end = prefix_end(prefix);
        self.iter_range(prefix, end.as_deref())
    }

    /// One page of `[start, end)`.
    ///
    /// Default implementation materializes the range and slices it.
    /// Backends may override to skip without copying.
    fn iter_range_page(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        page: Page,
    ) -> StoreResult<Vec<KvPair>> {
        let Some((skip, take)) = page.window() else {
            return Ok(vec![]);
        };
        Ok(self
            .iter_range(start, end)?
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    /// Apply several writes.
    ///
    /// Default implementation calls `set()` for each pair. Backends override
    /// this when they can apply the whole batch atomically.
    fn write_batch(&self, batch: Vec<KvPair>) -> StoreResult<()> {
        for (key, value) in batch {
            self.set(&key, &value)?;
        }
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn iter_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        (**self).iter_range(start, end)
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).has(key)
    }

    fn set_once(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set_once(key, value)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<KvPair>> {
        (**self).iter_prefix(prefix)
    }

    fn iter_range_page(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        page: Page,
    ) -> StoreResult<Vec<KvPair>> {
        (**self).iter_range_page(start, end, page)
    }

    fn write_batch(&self, batch: Vec<KvPair>) -> StoreResult<()> {
        (**self).write_batch(batch)
    }
}

/// Smallest key strictly greater than every key starting with `prefix`.
///
/// Returns `None` when no such key exists (empty prefix or all `0xff`),
/// meaning the prefix range is open above.
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
