use chrono::{DateTime, Utc};
use clerk_types::{EventRecord, RootChainEvent, RootChainType};

use crate::error::ClerkResult;

/// Write boundary used by transaction handlers.
pub trait RecordWriter {
    /// Assign the next canonical ID to `event` and write every index for it.
    fn ingest(&self, event: RootChainEvent) -> ClerkResult<u64>;
}

/// Read boundary used by transaction handlers and query services.
///
/// Absence is `Ok(None)`, never an error.
pub trait RecordReader {
    fn get_by_id(&self, id: u64) -> ClerkResult<Option<EventRecord>>;

    fn get_by_root_chain(
        &self,
        chain: &RootChainType,
        origin_id: u64,
    ) -> ClerkResult<Option<EventRecord>>;

    /// Translate a root-chain origin ID into the canonical ID.
    fn get_canonical_id_by_root_id(
        &self,
        chain: &RootChainType,
        origin_id: u64,
    ) -> ClerkResult<Option<u64>>;

    fn has_event_record(&self, id: u64) -> ClerkResult<bool>;

    fn has_root_chain_event_record(
        &self,
        chain: &RootChainType,
        origin_id: u64,
    ) -> ClerkResult<bool>;

    /// Records in canonical ID order. `page` is 1-based; `limit` is capped
    /// at [`crate::MAX_PAGE_LIMIT`].
    fn list_paginated(&self, page: u64, limit: u64) -> ClerkResult<Vec<EventRecord>>;

    /// Records with `from <= record_time <= to`, in time order. `page == 0`
    /// together with `limit == 0` returns the whole range.
    fn list_by_time_range(
        &self,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> ClerkResult<Vec<EventRecord>>;

    /// Same as [`RecordReader::list_by_time_range`], restricted to one chain.
    fn list_by_root_chain_time_range(
        &self,
        chain: &RootChainType,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> ClerkResult<Vec<EventRecord>>;

    /// Every record, in canonical ID order.
    fn list_all(&self) -> ClerkResult<Vec<EventRecord>>;
}

/// Membership set of relayer submission tokens.
pub trait SequenceLedger {
    fn has_sequence(&self, token: &str) -> ClerkResult<bool>;

    /// Record `token` as processed. Marking twice is not an error.
    fn mark_sequence(&self, token: &str) -> ClerkResult<()>;

    /// Every marked token, in byte order.
    fn list_sequences(&self) -> ClerkResult<Vec<String>>;
}
