//! Key-value contract shared by the store backends.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::disk::DiskStore;
use super::error::StoreError;
use super::memory::MemoryStore;
use super::rest::RestStore;

/// One stored snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Row identity. Upserting with the same key replaces the row.
    pub key: String,
    /// Opaque JSON payload, stored and served back verbatim.
    pub payload: serde_json::Value,
    /// When the payload was produced.
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the row is still within its TTL at `now`.
    ///
    /// A row whose timestamp sits in the future (clock skew between
    /// writer and reader) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.updated_at) < ttl
    }
}

/// Interface every snapshot store backend implements.
///
/// Reads distinguish "no row" (`Ok(None)`) from backend failure (`Err`);
/// the snapshot layer treats the two differently.
pub trait SnapshotStore {
    /// Fetch the row for `key`, if any.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<CacheEntry>, StoreError>> + Send;

    /// Insert the row, or replace an existing row with the same key.
    fn upsert(&self, entry: &CacheEntry) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A configured store backend.
///
/// Handlers and background jobs hold one of these; which backend it is
/// gets decided once, from the environment, at startup.
#[derive(Clone)]
pub enum Store {
    Rest(RestStore),
    Disk(DiskStore),
    Memory(MemoryStore),
}

impl Store {
    /// Short backend label for startup logging.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Rest(_) => "rest",
            Store::Disk(_) => "disk",
            Store::Memory(_) => "memory",
        }
    }
}

impl SnapshotStore for Store {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        match self {
            Store::Rest(store) => store.get(key).await,
            Store::Disk(store) => store.get(key).await,
            Store::Memory(store) => store.get(key).await,
        }
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        match self {
            Store::Rest(store) => store.upsert(entry).await,
            Store::Disk(store) => store.upsert(entry).await,
            Store::Memory(store) => store.upsert(entry).await,
        }
    }
}
