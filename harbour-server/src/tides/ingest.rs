//! Scheduled tide refresh.

use chrono::Utc;
use chrono_tz::Tz;
use tracing::warn;

use crate::store::{CacheEntry, SnapshotStore};

use super::client::TideFeedClient;
use super::error::TideError;
use super::parse::{TideEvent, TidesPayload, parse_feed};

/// Store key of the tides row.
pub const TIDES_CACHE_KEY: &str = "tides";

/// Fetches the tide feed and keeps the stored payload current.
///
/// Held by the background refresh task; `refresh` replaces the whole
/// payload on success and leaves it alone on any failure.
pub struct TideIngest<T: SnapshotStore> {
    client: TideFeedClient,
    store: T,
    timezone: Tz,
}

impl<T: SnapshotStore> TideIngest<T> {
    /// Create a new tide ingest.
    pub fn new(client: TideFeedClient, store: T, timezone: Tz) -> Self {
        Self {
            client,
            store,
            timezone,
        }
    }

    /// Fetch, parse, and store the current predictions.
    ///
    /// Returns the number of events stored.
    pub async fn refresh(&self) -> Result<usize, TideError> {
        let xml = self.client.fetch_feed().await?;
        self.store_events(parse_feed(&xml, self.timezone)).await
    }

    /// Store parsed events under the tides key.
    ///
    /// An empty parse is a no-op: a feed that breaks or changes layout
    /// must not wipe predictions the site already has.
    async fn store_events(&self, events: Vec<TideEvent>) -> Result<usize, TideError> {
        if events.is_empty() {
            warn!("Tide feed parsed to no events, keeping stored payload");
            return Ok(0);
        }

        let count = events.len();
        let payload = serde_json::to_value(&TidesPayload { events })?;

        let entry = CacheEntry {
            key: TIDES_CACHE_KEY.to_string(),
            payload,
            updated_at: Utc::now(),
        };
        self.store.upsert(&entry).await?;

        Ok(count)
    }
}
