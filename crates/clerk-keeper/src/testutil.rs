use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use clerk_store::{InMemoryKvStore, KvPair, KvStore, StoreError, StoreResult};
use clerk_types::{EventPayload, RootChainEvent, RootChainType};

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub(crate) fn event(chain: RootChainType, origin_id: u64, secs: i64) -> RootChainEvent {
    RootChainEvent::new(
        chain.clone(),
        origin_id,
        at(secs),
        EventPayload {
            contract: format!("0x{chain}-contract"),
            data: origin_id.to_be_bytes().to_vec(),
            tx_hash: format!("0x{origin_id:064x}"),
            log_index: origin_id % 7,
            chain_id: "137".into(),
        },
    )
}

/// Store that fails every write once its write budget is spent.
///
/// Nothing is rolled back: writes made before the failure stay visible,
/// which is what a best-effort backend would leave behind after a crash.
pub(crate) struct FaultyStore {
    pub(crate) inner: InMemoryKvStore,
    budget: Mutex<Option<usize>>,
}

impl FaultyStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: InMemoryKvStore::new(),
            budget: Mutex::new(None),
        }
    }

    /// Allow `writes` more writes, then fail.
    pub(crate) fn fail_after(&self, writes: usize) {
        *self.budget.lock().unwrap() = Some(writes);
    }

    pub(crate) fn heal(&self) {
        *self.budget.lock().unwrap() = None;
    }

    fn spend(&self) -> StoreResult<()> {
        let mut budget = self.budget.lock().unwrap();
        match budget.as_mut() {
            None => Ok(()),
            Some(0) => Err(StoreError::Backend("injected write failure".into())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
        }
    }
}

impl KvStore for FaultyStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.spend()?;
        self.inner.set(key, value)
    }

    fn set_once(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.spend()?;
        self.inner.set_once(key, value)
    }

    fn iter_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        self.inner.iter_range(start, end)
    }
}
