use std::fs;
use std::path::Path;

use anyhow::Context;
use clerk_keeper::{
    ClerkError, ClerkKeeper, RecordWriter, RootChainRegistry, SequenceLedger,
};
use clerk_store::{CacheKvStore, KvStore};
use clerk_types::{RootChainEvent, SequenceToken};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One entry of an event file.
///
/// The sequence token is taken from `sequence` when present, otherwise
/// derived from `block_number` and the payload's log index. Entries with
/// neither are applied without sequence tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub block_number: Option<u64>,
    pub event: RootChainEvent,
}

impl ReplayEntry {
    pub fn token(&self) -> anyhow::Result<Option<SequenceToken>> {
        let token = match (&self.sequence, self.block_number) {
            (Some(token), _) => SequenceToken::new(token.clone())?,
            (None, Some(block)) => SequenceToken::from_log_position(
                &self.event.root_chain_type,
                block,
                self.event.payload.log_index,
            )?,
            (None, None) => return Ok(None),
        };
        Ok(Some(token))
    }
}

/// What happened to one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ingested(u64),
    /// The sequence token was already processed.
    SequenceSeen,
    /// The event itself was already ingested.
    Duplicate,
    /// The root chain is not accepted.
    Rejected,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub ingested: usize,
    pub sequence_seen: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Ingested(_) => self.ingested += 1,
            Outcome::SequenceSeen => self.sequence_seen += 1,
            Outcome::Duplicate => self.duplicates += 1,
            Outcome::Rejected => self.rejected += 1,
        }
    }
}

pub fn load_events(path: &Path) -> anyhow::Result<Vec<ReplayEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading events {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing events {}", path.display()))
}

/// Apply one entry inside its own transaction.
///
/// The sequence check, the ingestion and the sequence mark are buffered in
/// a [`CacheKvStore`]; they reach `store` only if the ingestion succeeds.
pub fn apply<S, P>(store: &S, params: &P, entry: &ReplayEntry) -> anyhow::Result<Outcome>
where
    S: KvStore + ?Sized,
    P: RootChainRegistry,
{
    let token = entry.token()?;
    let tx = CacheKvStore::new(store);
    let keeper = ClerkKeeper::new(&tx, params);

    if let Some(token) = &token {
        if keeper.has_sequence(token.as_str())? {
            debug!(sequence = %token, "sequence already processed");
            return Ok(Outcome::SequenceSeen);
        }
    }

    let event = &entry.event;
    match keeper.ingest(event.clone()) {
        Ok(id) => {
            if let Some(token) = &token {
                keeper.mark_sequence(token.as_str())?;
            }
            drop(keeper);
            tx.commit()?;
            Ok(Outcome::Ingested(id))
        }
        Err(err) if err.is_duplicate() => {
            warn!(
                chain = %event.root_chain_type,
                origin_id = event.origin_id,
                error = %err,
                "skipping already ingested event"
            );
            Ok(Outcome::Duplicate)
        }
        Err(ClerkError::UnknownRootChain(chain)) => {
            warn!(chain = %chain, origin_id = event.origin_id, "skipping event from rejected chain");
            Ok(Outcome::Rejected)
        }
        Err(err) => Err(err).with_context(|| {
            format!(
                "ingesting {}:{}",
                event.root_chain_type, event.origin_id
            )
        }),
    }
}

pub fn replay_all<S, P>(
    store: &S,
    params: &P,
    entries: &[ReplayEntry],
) -> anyhow::Result<ReplaySummary>
where
    S: KvStore + ?Sized,
    P: RootChainRegistry,
{
    let mut summary = ReplaySummary::default();
    for entry in entries {
        let outcome = apply(store, params, entry)?;
        summary.record(&outcome);
    }
    info!(
        ingested = summary.ingested,
        sequence_seen = summary.sequence_seen,
        duplicates = summary.duplicates,
        rejected = summary.rejected,
        "replay finished"
    );
    Ok(summary)
}
