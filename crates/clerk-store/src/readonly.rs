use crate::error::{StoreError, StoreResult};
use crate::pagination::Page;
use crate::traits::{KvPair, KvStore};

/// Read-only view over a store, for query services.
///
/// Every read is forwarded; every write fails with
/// [`StoreError::ReadOnly`] and leaves the underlying store untouched.
#[derive(Debug)]
pub struct ReadOnlyStore<'a, S: KvStore + ?Sized> {
    inner: &'a S,
}

impl<'a, S: KvStore + ?Sized> ReadOnlyStore<'a, S> {
    pub fn new(inner: &'a S) -> Self {
        Self { inner }
    }
}

impl<S: KvStore + ?Sized> KvStore for ReadOnlyStore<'_, S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, _key: &[u8], _value: &[u8]) -> StoreResult<()> {
        Err(StoreError::ReadOnly)
    }

    fn iter_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        self.inner.iter_range(start, end)
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        self.inner.has(key)
    }

    fn set_once(&self, _key: &[u8], _value: &[u8]) -> StoreResult<()> {
        Err(StoreError::ReadOnly)
    }

    fn iter_range_page(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        page: Page,
    ) -> StoreResult<Vec<KvPair>> {
        self.inner.iter_range_page(start, end, page)
    }

    fn write_batch(&self, _batch: Vec<KvPair>) -> StoreResult<()> {
        Err(StoreError::ReadOnly)
    }
}
