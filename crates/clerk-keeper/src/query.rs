use chrono::{DateTime, Utc};
use clerk_store::{prefix_end, KvPair, KvStore, Page};
use clerk_types::{EventRecord, RootChainType};
use tracing::warn;

use crate::codec;
use crate::error::ClerkResult;
use crate::keeper::ClerkKeeper;
use crate::keys::{self, IndexFamily};
use crate::traits::RecordReader;

/// Hard ceiling on the number of records a paginated query returns.
pub const MAX_PAGE_LIMIT: u64 = 50;

impl<S: KvStore, P> ClerkKeeper<S, P> {
    fn decode_records(entries: Vec<KvPair>) -> Vec<EventRecord> {
        entries
            .into_iter()
            .filter_map(|(key, value)| match codec::decode_record(&value) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(key = ?key, error = %err, "skipping undecodable event record");
                    None
                }
            })
            .collect()
    }

    /// Resolve time index pointers through the canonical record index.
    /// Dangling or undecodable pointers are logged and skipped.
    fn resolve_pointers(&self, entries: Vec<KvPair>) -> Vec<EventRecord> {
        let mut records = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let id = match codec::decode_id(&value) {
                Ok(id) => id,
                Err(err) => {
                    warn!(key = ?key, error = %err, "skipping undecodable time index entry");
                    continue;
                }
            };
            match self.get_by_id(id) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => warn!(id, "time index points at a missing record"),
                Err(err) => warn!(id, error = %err, "failed to resolve time index entry"),
            }
        }
        records
    }

    fn scan_time_index(
        &self,
        from_prefix: Vec<u8>,
        to_prefix: &[u8],
        page: u64,
        limit: u64,
    ) -> ClerkResult<Vec<EventRecord>> {
        let (start, end) = keys::closed_time_range(from_prefix, to_prefix);
        let entries = if page == 0 && limit == 0 {
            self.store.iter_range(&start, end.as_deref())?
        } else {
            self.store.iter_range_page(
                &start,
                end.as_deref(),
                Page::new(page, limit).clamp(MAX_PAGE_LIMIT),
            )?
        };
        Ok(self.resolve_pointers(entries))
    }
}

impl<S: KvStore, P> RecordReader for ClerkKeeper<S, P> {
    fn get_by_id(&self, id: u64) -> ClerkResult<Option<EventRecord>> {
        self.store
            .get(&keys::record_key(id))?
            .map(|bytes| codec::decode_record(&bytes))
            .transpose()
    }

    fn get_by_root_chain(
        &self,
        chain: &RootChainType,
        origin_id: u64,
    ) -> ClerkResult<Option<EventRecord>> {
        let key = keys::root_chain_record_key(chain, origin_id)?;
        self.store
            .get(&key)?
            .map(|bytes| codec::decode_record(&bytes))
            .transpose()
    }

    fn get_canonical_id_by_root_id(
        &self,
        chain: &RootChainType,
        origin_id: u64,
    ) -> ClerkResult<Option<u64>> {
        let key = keys::root_to_canonical_key(chain, origin_id)?;
        self.store
            .get(&key)?
            .map(|bytes| codec::decode_id(&bytes))
            .transpose()
    }

    fn has_event_record(&self, id: u64) -> ClerkResult<bool> {
        Ok(self.store.has(&keys::record_key(id))?)
    }

    fn has_root_chain_event_record(
        &self,
        chain: &RootChainType,
        origin_id: u64,
    ) -> ClerkResult<bool> {
        Ok(self
            .store
            .has(&keys::root_chain_record_key(chain, origin_id)?)?)
    }

    fn list_paginated(&self, page: u64, limit: u64) -> ClerkResult<Vec<EventRecord>> {
        let prefix = IndexFamily::Record.prefix();
        let end = prefix_end(&prefix);
        let entries = self.store.iter_range_page(
            &prefix,
            end.as_deref(),
            Page::new(page, limit).clamp(MAX_PAGE_LIMIT),
        )?;
        Ok(Self::decode_records(entries))
    }

    fn list_by_time_range(
        &self,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> ClerkResult<Vec<EventRecord>> {
        self.scan_time_index(
            keys::record_time_prefix(from),
            &keys::record_time_prefix(to),
            page,
            limit,
        )
    }

    fn list_by_root_chain_time_range(
        &self,
        chain: &RootChainType,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> ClerkResult<Vec<EventRecord>> {
        self.scan_time_index(
            keys::root_chain_record_time_prefix(chain, from)?,
            &keys::root_chain_record_time_prefix(chain, to)?,
            page,
            limit,
        )
    }

    fn list_all(&self) -> ClerkResult<Vec<EventRecord>> {
        let entries = self.store.iter_prefix(&IndexFamily::Record.prefix())?;
        Ok(Self::decode_records(entries))
    }
}

#[cfg(test)]
mod tests {
    use clerk_store::{InMemoryKvStore, ReadOnlyStore, StoreError};

    use super::*;
    use crate::error::ClerkError;
    use crate::testutil::{at, event};
    use crate::traits::RecordWriter;

    fn keeper_with(n: u64) -> ClerkKeeper<InMemoryKvStore> {
        let keeper = ClerkKeeper::with_default_params(InMemoryKvStore::new());
        for i in 1..=n {
            let chain = if i % 2 == 0 { RootChainType::Tron } else { RootChainType::Eth };
            // record i is ingested at time 10 * i
            keeper.ingest(event(chain, 1_000 + i, 10 * i as i64)).unwrap();
        }
        keeper
    }

    fn ids(records: &[EventRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    // -----------------------------------------------------------------------
    // Point lookups
    // -----------------------------------------------------------------------

    #[test]
    fn lookups_by_every_key() {
        let keeper = keeper_with(3);
        let record = keeper.get_by_id(2).unwrap().unwrap();
        assert_eq!(record.root_chain_type, RootChainType::Tron);
        assert_eq!(record.origin_id, 1_002);

        let by_root = keeper
            .get_by_root_chain(&RootChainType::Tron, 1_002)
            .unwrap()
            .unwrap();
        assert_eq!(by_root, record);
        assert_eq!(
            keeper
                .get_canonical_id_by_root_id(&RootChainType::Tron, 1_002)
                .unwrap(),
            Some(2)
        );
        assert!(keeper.has_event_record(2).unwrap());
        assert!(keeper
            .has_root_chain_event_record(&RootChainType::Tron, 1_002)
            .unwrap());
    }

    #[test]
    fn misses_are_none_not_errors() {
        let keeper = keeper_with(1);
        assert!(keeper.get_by_id(99).unwrap().is_none());
        assert!(keeper
            .get_by_root_chain(&RootChainType::Tron, 1_001)
            .unwrap()
            .is_none());
        assert!(keeper
            .get_canonical_id_by_root_id(&RootChainType::Eth, 5)
            .unwrap()
            .is_none());
        assert!(!keeper.has_event_record(99).unwrap());
    }

    #[test]
    fn unknown_chain_lookup_is_typed_error() {
        let keeper = keeper_with(1);
        let unknown = RootChainType::Unknown("sol".into());
        assert_eq!(
            keeper.get_by_root_chain(&unknown, 1),
            Err(ClerkError::UnknownRootChain("sol".into()))
        );
    }

    #[test]
    fn corrupt_record_is_codec_error_on_lookup() {
        let keeper = keeper_with(0);
        keeper.store().set(&keys::record_key(1), b"junk").unwrap();
        assert!(matches!(keeper.get_by_id(1), Err(ClerkError::Codec(_))));
    }

    // -----------------------------------------------------------------------
    // Pagination
    // -----------------------------------------------------------------------

    #[test]
    fn pages_follow_id_order_past_single_digits() {
        let keeper = keeper_with(12);
        assert_eq!(ids(&keeper.list_paginated(1, 5).unwrap()), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(&keeper.list_paginated(2, 5).unwrap()), vec![6, 7, 8, 9, 10]);
        assert_eq!(ids(&keeper.list_paginated(3, 5).unwrap()), vec![11, 12]);
        assert!(keeper.list_paginated(4, 5).unwrap().is_empty());
    }

    #[test]
    fn limit_is_capped() {
        let keeper = keeper_with(60);
        let page = keeper.list_paginated(1, 1_000).unwrap();
        assert_eq!(page.len(), 50);
        assert_eq!(ids(&keeper.list_paginated(2, 1_000).unwrap()), (51..=60).collect::<Vec<_>>());
    }

    #[test]
    fn page_zero_is_empty() {
        let keeper = keeper_with(3);
        assert!(keeper.list_paginated(0, 10).unwrap().is_empty());
        assert!(keeper.list_paginated(1, 0).unwrap().is_empty());
    }

    #[test]
    fn listing_skips_undecodable_records() {
        let keeper = keeper_with(3);
        keeper.store().set(&keys::record_key(2), b"junk").unwrap();
        assert_eq!(ids(&keeper.list_paginated(1, 10).unwrap()), vec![1, 3]);
        assert_eq!(ids(&keeper.list_all().unwrap()), vec![1, 3]);
    }

    #[test]
    fn list_all_is_unbounded() {
        let keeper = keeper_with(75);
        assert_eq!(keeper.list_all().unwrap().len(), 75);
    }

    // -----------------------------------------------------------------------
    // Time ranges
    // -----------------------------------------------------------------------

    #[test]
    fn time_range_is_closed() {
        let keeper = keeper_with(6);
        let records = keeper.list_by_time_range(&at(20), &at(40), 0, 0).unwrap();
        assert_eq!(ids(&records), vec![2, 3, 4]);
    }

    #[test]
    fn time_range_is_time_ordered() {
        let keeper = ClerkKeeper::with_default_params(InMemoryKvStore::new());
        keeper.ingest(event(RootChainType::Eth, 1, 300)).unwrap();
        keeper.ingest(event(RootChainType::Eth, 2, 100)).unwrap();
        keeper.ingest(event(RootChainType::Eth, 3, 200)).unwrap();
        keeper.ingest(event(RootChainType::Eth, 4, 100)).unwrap();

        let records = keeper.list_by_time_range(&at(0), &at(1_000), 0, 0).unwrap();
        assert_eq!(ids(&records), vec![2, 4, 3, 1]);
    }

    #[test]
    fn time_range_pagination() {
        let keeper = keeper_with(8);
        let page = keeper.list_by_time_range(&at(10), &at(80), 2, 3).unwrap();
        assert_eq!(ids(&page), vec![4, 5, 6]);
        let capped = keeper.list_by_time_range(&at(0), &at(1_000), 1, 500).unwrap();
        assert_eq!(capped.len(), 8);
        assert!(keeper.list_by_time_range(&at(0), &at(1_000), 0, 3).unwrap().is_empty());
    }

    #[test]
    fn time_range_limit_is_capped() {
        let keeper = keeper_with(70);
        let first = keeper.list_by_time_range(&at(0), &at(1_000), 1, 500).unwrap();
        assert_eq!(first.len(), 50);
        let second = keeper.list_by_time_range(&at(0), &at(1_000), 2, 500).unwrap();
        assert_eq!(ids(&second), (51..=70).collect::<Vec<_>>());
        assert_eq!(
            keeper.list_by_time_range(&at(0), &at(1_000), 0, 0).unwrap().len(),
            70
        );
    }

    #[test]
    fn root_chain_time_range_limit_is_capped() {
        // odd ids are eth, so records 1, 3, ..., 139 fill the chain index
        let keeper = keeper_with(140);
        let eth = RootChainType::Eth;
        let first = keeper
            .list_by_root_chain_time_range(&eth, &at(0), &at(2_000), 1, 500)
            .unwrap();
        assert_eq!(first.len(), 50);
        assert_eq!(first.last().map(|r| r.id), Some(99));
        let second = keeper
            .list_by_root_chain_time_range(&eth, &at(0), &at(2_000), 2, 500)
            .unwrap();
        assert_eq!(second.len(), 20);
        assert_eq!(second.first().map(|r| r.id), Some(101));
    }

    #[test]
    fn inverted_time_range_is_empty() {
        let keeper = keeper_with(4);
        assert!(keeper.list_by_time_range(&at(40), &at(10), 0, 0).unwrap().is_empty());
    }

    #[test]
    fn root_chain_time_range_filters_by_chain() {
        let keeper = keeper_with(6);
        let tron = keeper
            .list_by_root_chain_time_range(&RootChainType::Tron, &at(0), &at(60), 0, 0)
            .unwrap();
        assert_eq!(ids(&tron), vec![2, 4, 6]);
        let eth = keeper
            .list_by_root_chain_time_range(&RootChainType::Eth, &at(10), &at(30), 1, 1)
            .unwrap();
        assert_eq!(ids(&eth), vec![1]);
    }

    #[test]
    fn dangling_time_pointer_is_skipped() {
        let keeper = keeper_with(2);
        keeper
            .store()
            .set(&keys::record_time_key(&at(15), 77), &codec::encode_id(77).unwrap())
            .unwrap();
        keeper
            .store()
            .set(&keys::record_time_key(&at(16), 78), b"x")
            .unwrap();
        let records = keeper.list_by_time_range(&at(0), &at(100), 0, 0).unwrap();
        assert_eq!(ids(&records), vec![1, 2]);
    }

    // -----------------------------------------------------------------------
    // Read-only snapshots
    // -----------------------------------------------------------------------

    #[test]
    fn queries_run_on_read_only_view() {
        let keeper = keeper_with(3);
        let view = ClerkKeeper::with_default_params(ReadOnlyStore::new(keeper.store()));
        assert_eq!(view.list_all().unwrap().len(), 3);
        assert_eq!(
            view.ingest(event(RootChainType::Eth, 5_000, 0)),
            Err(ClerkError::Store(StoreError::ReadOnly))
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn time_range_contains_exactly_records_inside(
                times in proptest::collection::vec(0i64..200, 1..30),
                from in 0i64..200,
                span in 0i64..200,
            ) {
                let keeper = ClerkKeeper::with_default_params(InMemoryKvStore::new());
                for (origin_id, secs) in times.iter().enumerate() {
                    keeper.ingest(event(RootChainType::Eth, origin_id as u64, *secs)).unwrap();
                }
                let to = from + span;
                let records = keeper.list_by_time_range(&at(from), &at(to), 0, 0).unwrap();

                let expected = times.iter().filter(|t| **t >= from && **t <= to).count();
                prop_assert_eq!(records.len(), expected);
                for pair in records.windows(2) {
                    prop_assert!(pair[0].record_time <= pair[1].record_time);
                }
                for record in &records {
                    prop_assert!(record.record_time >= at(from) && record.record_time <= at(to));
                }
            }

            #[test]
            fn pages_never_exceed_ceiling(page in 0u64..5, limit in 0u64..500) {
                let keeper = keeper_with(120);
                let records = keeper.list_paginated(page, limit).unwrap();
                prop_assert!(records.len() as u64 <= MAX_PAGE_LIMIT);
                prop_assert!(records.len() as u64 <= limit);
            }
        }
    }
}
