//! Foundation types for the clerk.
//!
//! The clerk records events observed on external root chains exactly once
//! and indexes them for the replicated state machine. Every other clerk
//! crate depends on `clerk-types`.
//!
//! # Key Types
//!
//! - [`RootChainType`] -- Closed set of bridged root chains, with an explicit unknown variant
//! - [`RootChainEvent`] -- An observed root-chain event submitted for ingestion
//! - [`EventRecord`] -- A stored event carrying its canonical ID
//! - [`EventPayload`] -- Opaque event data carried through unchanged
//! - [`SequenceToken`] -- Relayer idempotency token

pub mod chain;
pub mod error;
pub mod record;
pub mod sequence;

pub use chain::RootChainType;
pub use error::TypeError;
pub use record::{EventPayload, EventRecord, RootChainEvent};
pub use sequence::{SequenceToken, DEFAULT_LOG_INDEX_UNIT};
