//! Ordered key-value storage for the clerk.
//!
//! The clerk keeper owns a dedicated portion of the replicated state store.
//! This crate defines the interface it consumes and ships the backends used
//! to run and test it.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`CacheKvStore`] -- buffered overlay committed or discarded as a unit
//! - [`ReadOnlyStore`] -- query view that rejects every write
//!
//! # Design Rules
//!
//! 1. Keys are raw byte strings, iterated in lexicographic order.
//! 2. [`KvStore::set_once`] is the write-once primitive: it never overwrites.
//! 3. Atomicity across several writes belongs to the caller's transaction
//!    ([`CacheKvStore`]), never to the store itself.
//! 4. The store never interprets values.

pub mod cache;
pub mod digest;
pub mod error;
pub mod memory;
pub mod pagination;
pub mod readonly;
pub mod traits;

pub use cache::CacheKvStore;
pub use digest::state_digest;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use pagination::Page;
pub use readonly::ReadOnlyStore;
pub use traits::{prefix_end, KvPair, KvStore};
