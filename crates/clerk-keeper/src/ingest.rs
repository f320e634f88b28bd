use clerk_store::{KvStore, StoreError};
use clerk_types::RootChainEvent;
use tracing::{debug, warn};

use crate::codec;
use crate::error::{ClerkError, ClerkResult};
use crate::keeper::ClerkKeeper;
use crate::keys;
use crate::params::RootChainRegistry;
use crate::traits::RecordWriter;

impl<S: KvStore, P: RootChainRegistry> RecordWriter for ClerkKeeper<S, P> {
    /// Ingest one root-chain event.
    ///
    /// Writes, in order and each through the write-once primitive: the
    /// dedupe entry (full record), the cross-reference (canonical ID), the
    /// canonical record, the root-chain time index and the canonical time
    /// index. The ID counter advances only after all five succeed.
    ///
    /// Because the counter moves last, a failure at any earlier step leaves
    /// it where it was and a retry recomputes the same candidate ID; the
    /// retry then stops at the first key that already exists instead of
    /// issuing a second ID for the event. Atomicity of the whole sequence is
    /// the enclosing transaction's job: over a best-effort store a failed
    /// ingest is detected on retry (as a duplicate) but the partial writes
    /// stay behind.
    fn ingest(&self, event: RootChainEvent) -> ClerkResult<u64> {
        let chain = event.root_chain_type.clone();
        let origin_id = event.origin_id;

        if !self.params.is_recognized(&chain) {
            warn!(chain = %chain, origin_id, "rejecting event from unrecognized root chain");
            return Err(ClerkError::UnknownRootChain(chain.to_string()));
        }

        let latest = self.latest_id()?;
        let candidate = latest.checked_add(1).ok_or(ClerkError::IdExhausted)?;

        let dedupe_key = keys::root_chain_record_key(&chain, origin_id)?;
        let cross_key = keys::root_to_canonical_key(&chain, origin_id)?;
        let record_key = keys::record_key(candidate);
        let chain_time_key =
            keys::root_chain_record_time_key(&chain, &event.record_time, candidate)?;
        let time_key = keys::record_time_key(&event.record_time, candidate);

        let record = event.into_record(candidate);
        let body = codec::encode_record(&record)?;
        let pointer = codec::encode_id(candidate)?;

        self.store
            .set_once(&dedupe_key, &body)
            .map_err(|err| match err {
                StoreError::KeyExists { .. } => ClerkError::DuplicateRootChainEvent {
                    chain: chain.to_string(),
                    origin_id,
                },
                other => other.into(),
            })?;
        self.store.set_once(&cross_key, &pointer)?;
        self.store.set_once(&record_key, &body)?;
        self.store.set_once(&chain_time_key, &pointer)?;
        self.store.set_once(&time_key, &pointer)?;

        self.advance_to(candidate)?;

        debug!(
            id = candidate,
            chain = %chain,
            origin_id,
            record_time = %record.record_time,
            "ingested event record"
        );
        Ok(candidate)
    }
}
