//! Disk store backend.
//!
//! Keeps every row in one JSON file. Intended for local development and
//! single-instance deployments without a database; the file is small
//! (a handful of rows) so it is rewritten whole on every upsert.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::error::StoreError;
use super::kv::{CacheEntry, SnapshotStore};

/// On-disk file shape: rows keyed by cache key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DiskEntries {
    entries: HashMap<String, StoredEntry>,
}

/// One row as stored in the file. The key lives in the map, not here.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    payload: serde_json::Value,
    updated_at: DateTime<Utc>,
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct DiskStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles between jobs and handlers.
    lock: Arc<Mutex<()>>,
}

impl DiskStore {
    /// Create a new disk store writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Load the store file, treating a missing or unreadable file as empty.
///
/// A corrupt file heals itself: the next upsert rewrites it whole.
fn load_entries(path: &Path) -> DiskEntries {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
        .unwrap_or_default()
}

impl SnapshotStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let _guard = self.lock.lock().await;

        let mut all = load_entries(&self.path);
        Ok(all.entries.remove(key).map(|stored| CacheEntry {
            key: key.to_string(),
            payload: stored.payload,
            updated_at: stored.updated_at,
        }))
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut all = load_entries(&self.path);
        all.entries.insert(
            entry.key.clone(),
            StoredEntry {
                payload: entry.payload.clone(),
                updated_at: entry.updated_at,
            },
        );

        // Create parent directories if needed
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                message: format!("failed to create store directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(&all).map_err(|e| StoreError::Serde {
            message: format!("failed to serialize store file: {}", e),
        })?;

        std::fs::write(&self.path, json).map_err(|e| StoreError::Io {
            message: format!("failed to write store file: {}", e),
        })?;

        Ok(())
    }
}
