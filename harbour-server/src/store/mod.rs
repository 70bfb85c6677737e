//! Snapshot persistence.
//!
//! A snapshot is one row in a key-value store: an opaque JSON payload
//! plus the time it was produced. The store outlives the process, so a
//! redeploy does not cost an upstream API call. Three backends share
//! one interface: a hosted PostgREST table for production, a JSON file
//! for development, and an in-memory map for tests.

mod disk;
mod error;
mod kv;
mod memory;
mod rest;

pub use disk::DiskStore;
pub use error::StoreError;
pub use kv::{CacheEntry, SnapshotStore, Store};
pub use memory::MemoryStore;
pub use rest::{RestStore, RestStoreConfig};
