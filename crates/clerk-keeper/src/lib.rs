//! Bridged event record keeper (the clerk).
//!
//! This crate is the heart of the clerk. It provides:
//! - A deterministic key encoding over disjoint one-byte index families
//! - A sequence ledger for relayer idempotency tokens
//! - A monotonic canonical ID allocator
//! - Write-once ingestion that builds every index for a record
//! - Point lookups and paginated range queries over those indexes
//! - Genesis export and import
//!
//! The keeper holds no lock and performs no I/O of its own. Every write of
//! one ingestion lands in the store handed to [`ClerkKeeper`]; atomicity
//! across those writes comes from running the keeper over a transactional
//! overlay such as [`clerk_store::CacheKvStore`].

pub mod allocator;
pub mod codec;
pub mod error;
pub mod genesis;
pub mod ingest;
pub mod keeper;
pub mod keys;
pub mod params;
pub mod query;
pub mod sequence;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{ClerkError, ClerkResult};
pub use genesis::GenesisState;
pub use keeper::ClerkKeeper;
pub use keys::IndexFamily;
pub use params::{ChainParams, RootChainRegistry};
pub use query::MAX_PAGE_LIMIT;
pub use traits::{RecordReader, RecordWriter, SequenceLedger};
