use std::collections::HashSet;

use clerk_store::KvStore;
use clerk_types::EventRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClerkError, ClerkResult};
use crate::keeper::ClerkKeeper;
use crate::params::RootChainRegistry;
use crate::traits::{RecordReader, RecordWriter, SequenceLedger};

/// Full keeper state in a portable form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub event_records: Vec<EventRecord>,
    #[serde(default)]
    pub record_sequences: Vec<String>,
}

impl GenesisState {
    /// Check that the state can be imported as-is.
    ///
    /// Records must be listed in canonical ID order starting at 1 without
    /// gaps, come from recognized root chains, and never repeat an
    /// `(root_chain_type, origin_id)` pair. Sequence tokens must be non-empty.
    pub fn validate<R: RootChainRegistry>(&self, registry: &R) -> ClerkResult<()> {
        let mut seen = HashSet::with_capacity(self.event_records.len());
        for (expected, record) in (1u64..).zip(&self.event_records) {
            if record.id != expected {
                return Err(ClerkError::InvalidGenesis(format!(
                    "record ids must run from 1 without gaps: expected {expected}, found {}",
                    record.id
                )));
            }
            if !registry.is_recognized(&record.root_chain_type) {
                return Err(ClerkError::InvalidGenesis(format!(
                    "record {} is from unrecognized root chain {}",
                    record.id, record.root_chain_type
                )));
            }
            if !seen.insert((&record.root_chain_type, record.origin_id)) {
                return Err(ClerkError::InvalidGenesis(format!(
                    "duplicate root chain event {}:{}",
                    record.root_chain_type, record.origin_id
                )));
            }
        }
        if self.record_sequences.iter().any(String::is_empty) {
            return Err(ClerkError::InvalidGenesis("empty sequence token".into()));
        }
        Ok(())
    }
}

impl<S: KvStore, P: RootChainRegistry> ClerkKeeper<S, P> {
    /// Snapshot every record and sequence token.
    pub fn export_genesis(&self) -> ClerkResult<GenesisState> {
        Ok(GenesisState {
            event_records: self.list_all()?,
            record_sequences: self.list_sequences()?,
        })
    }

    /// Load `state` into an empty keeper.
    ///
    /// Records go back through [`RecordWriter::ingest`] so every index is
    /// rebuilt, and each must receive the ID it was exported with.
    ///
    /// A failure part way through leaves the records imported so far in the
    /// store. Run the import over a [`clerk_store::CacheKvStore`] and commit
    /// only when it returns `Ok`.
    pub fn init_genesis(&self, state: &GenesisState) -> ClerkResult<()> {
        state.validate(&self.params)?;

        let latest = self.latest_id()?;
        if latest != 0 {
            return Err(ClerkError::InvalidGenesis(format!(
                "store already holds records up to id {latest}"
            )));
        }

        for record in &state.event_records {
            let assigned = self.ingest(record.to_event())?;
            if assigned != record.id {
                return Err(ClerkError::GenesisMismatch {
                    expected: record.id,
                    assigned,
                });
            }
        }
        for token in &state.record_sequences {
            self.mark_sequence(token)?;
        }

        info!(
            records = state.event_records.len(),
            sequences = state.record_sequences.len(),
            "imported genesis state"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clerk_store::{state_digest, CacheKvStore, InMemoryKvStore};
    use clerk_types::RootChainType;

    use super::*;
    use crate::params::ChainParams;
    use crate::testutil::event;

    fn populated() -> ClerkKeeper<InMemoryKvStore> {
        let keeper = ClerkKeeper::with_default_params(InMemoryKvStore::new());
        keeper.ingest(event(RootChainType::Eth, 7, 300)).unwrap();
        keeper.ingest(event(RootChainType::Tron, 7, 100)).unwrap();
        keeper.ingest(event(RootChainType::Eth, 8, 200)).unwrap();
        keeper.mark_sequence("eth:1200003").unwrap();
        keeper.mark_sequence("tron:500001").unwrap();
        keeper
    }

    #[test]
    fn export_then_import_rebuilds_identical_state() {
        let source = populated();
        let state = source.export_genesis().unwrap();
        assert_eq!(state.event_records.len(), 3);
        assert_eq!(state.record_sequences.len(), 2);

        let target = ClerkKeeper::with_default_params(InMemoryKvStore::new());
        target.init_genesis(&state).unwrap();

        assert_eq!(
            state_digest(target.store()).unwrap(),
            state_digest(source.store()).unwrap()
        );
        assert_eq!(target.latest_id().unwrap(), 3);
    }

    #[test]
    fn genesis_survives_json() {
        let state = populated().export_genesis().unwrap();
        let json = serde_json::to_string_pretty(&state).unwrap();
        let parsed: GenesisState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn empty_genesis_is_valid() {
        let parsed: GenesisState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, GenesisState::default());

        let keeper = ClerkKeeper::with_default_params(InMemoryKvStore::new());
        keeper.init_genesis(&parsed).unwrap();
        assert_eq!(keeper.latest_id().unwrap(), 0);
    }

    #[test]
    fn gap_in_ids_is_rejected() {
        let mut state = populated().export_genesis().unwrap();
        state.event_records.remove(1);
        let err = state.validate(&ChainParams::default()).unwrap_err();
        assert!(matches!(err, ClerkError::InvalidGenesis(_)));
    }

    #[test]
    fn duplicate_origin_is_rejected() {
        let mut state = populated().export_genesis().unwrap();
        state.event_records[2].origin_id = 7;
        assert!(matches!(
            state.validate(&ChainParams::default()),
            Err(ClerkError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn unrecognized_chain_is_rejected() {
        let state = populated().export_genesis().unwrap();
        let eth_only = ChainParams::new(vec![RootChainType::Eth]);
        assert!(matches!(
            state.validate(&eth_only),
            Err(ClerkError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn empty_token_is_rejected() {
        let mut state = GenesisState::default();
        state.record_sequences.push(String::new());
        assert!(state.validate(&ChainParams::default()).is_err());
    }

    #[test]
    fn import_into_populated_store_is_rejected() {
        let keeper = populated();
        let state = keeper.export_genesis().unwrap();
        assert!(matches!(
            keeper.init_genesis(&state),
            Err(ClerkError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn import_stops_at_squatted_key() {
        let state = populated().export_genesis().unwrap();
        let keeper = ClerkKeeper::with_default_params(InMemoryKvStore::new());
        keeper
            .store()
            .set(&crate::keys::record_key(1), b"squatter")
            .unwrap();
        assert!(matches!(
            keeper.init_genesis(&state),
            Err(ClerkError::KeyExists(_))
        ));
        assert_eq!(keeper.latest_id().unwrap(), 0);
    }

    #[test]
    fn failed_import_over_overlay_leaves_base_untouched() {
        let state = populated().export_genesis().unwrap();
        let base = InMemoryKvStore::new();
        base.set(&crate::keys::record_key(2), b"squatter").unwrap();
        let before = state_digest(&base).unwrap();

        let tx = CacheKvStore::new(&base);
        let keeper = ClerkKeeper::with_default_params(&tx);
        assert!(keeper.init_genesis(&state).is_err());
        assert_eq!(keeper.get_by_id(1).unwrap().map(|r| r.id), Some(1));
        drop(keeper);
        tx.discard();
        assert_eq!(state_digest(&base).unwrap(), before);

        let clean = InMemoryKvStore::new();
        let tx = CacheKvStore::new(&clean);
        ClerkKeeper::with_default_params(&tx).init_genesis(&state).unwrap();
        tx.commit().unwrap();
        assert_eq!(ClerkKeeper::with_default_params(&clean).latest_id().unwrap(), 3);
    }
}
