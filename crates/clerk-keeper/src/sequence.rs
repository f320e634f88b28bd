use clerk_store::KvStore;
use tracing::warn;

use crate::error::ClerkResult;
use crate::keeper::ClerkKeeper;
use crate::keys::{self, IndexFamily};
use crate::traits::SequenceLedger;

/// Value stored under every sequence key; only presence matters.
pub const SEQUENCE_MARKER: [u8; 1] = [0x01];

impl<S: KvStore, P> SequenceLedger for ClerkKeeper<S, P> {
    fn has_sequence(&self, token: &str) -> ClerkResult<bool> {
        Ok(self.store.has(&keys::sequence_key(token))?)
    }

    fn mark_sequence(&self, token: &str) -> ClerkResult<()> {
        self.store.set(&keys::sequence_key(token), &SEQUENCE_MARKER)?;
        Ok(())
    }

    fn list_sequences(&self) -> ClerkResult<Vec<String>> {
        let prefix = IndexFamily::Sequence.prefix();
        let mut sequences = Vec::new();
        for (key, _) in self.store.iter_prefix(&prefix)? {
            match String::from_utf8(key[prefix.len()..].to_vec()) {
                Ok(token) => sequences.push(token),
                Err(err) => warn!(error = %err, "skipping non-utf8 sequence key"),
            }
        }
        Ok(sequences)
    }
}
