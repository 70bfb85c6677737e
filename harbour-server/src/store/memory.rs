//! In-memory store backend.
//!
//! Rows vanish on restart, which defeats the point of persisting
//! snapshots across deploys; this backend exists for tests and for
//! poking at the server without touching disk or a database.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::StoreError;
use super::kv::{CacheEntry, SnapshotStore};

/// Map-backed snapshot store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows held.
    pub async fn len(&self) -> usize {
        let guard = self.entries.read().await;
        guard.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        let guard = self.entries.read().await;
        guard.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let guard = self.entries.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let mut guard = self.entries.write().await;
        guard.insert(entry.key.clone(), entry.clone());
        Ok(())
    }
}
