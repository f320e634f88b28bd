use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chain::RootChainType;

/// Opaque root-chain event data.
///
/// The clerk never interprets these fields. They are carried through
/// ingestion and returned unchanged by every query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventPayload {
    /// Emitting contract address, as rendered by the root chain.
    pub contract: String,
    /// Raw log data.
    pub data: Vec<u8>,
    /// Hash of the root-chain transaction that emitted the event.
    pub tx_hash: String,
    /// Position of the log within its transaction receipt.
    pub log_index: u64,
    /// Bor/child chain identifier the event is destined for.
    pub chain_id: String,
}

/// A root-chain event submitted for ingestion.
///
/// Carries everything an [`EventRecord`] does except the canonical ID, which
/// only the keeper assigns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootChainEvent {
    pub root_chain_type: RootChainType,
    /// Identifier of the event as numbered by the root chain.
    pub origin_id: u64,
    /// Consensus time at which the event is recorded.
    pub record_time: DateTime<Utc>,
    #[serde(default)]
    pub payload: EventPayload,
}

impl RootChainEvent {
    pub fn new(
        root_chain_type: RootChainType,
        origin_id: u64,
        record_time: DateTime<Utc>,
        payload: EventPayload,
    ) -> Self {
        Self {
            root_chain_type,
            origin_id,
            record_time,
            payload,
        }
    }

    /// Attach the canonical ID, producing the record that gets stored.
    pub fn into_record(self, id: u64) -> EventRecord {
        EventRecord {
            id,
            root_chain_type: self.root_chain_type,
            origin_id: self.origin_id,
            record_time: self.record_time,
            payload: self.payload,
        }
    }
}

/// A bridged event as stored by the clerk.
///
/// `id` is unique and strictly increasing in ingestion order.
/// `(root_chain_type, origin_id)` is unique across all records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Canonical identifier assigned at ingestion.
    pub id: u64,
    pub root_chain_type: RootChainType,
    pub origin_id: u64,
    pub record_time: DateTime<Utc>,
    pub payload: EventPayload,
}

impl EventRecord {
    /// Strip the canonical ID, recovering the submitted event.
    pub fn to_event(&self) -> RootChainEvent {
        RootChainEvent {
            root_chain_type: self.root_chain_type.clone(),
            origin_id: self.origin_id,
            record_time: self.record_time,
            payload: self.payload.clone(),
        }
    }
}
