//! Scheduled snapshot cache for the departure board.
//!
//! The timetable API is rate limited well below one request per page
//! view, so the endpoint never proxies it directly. Instead every
//! request walks a fixed decision ladder against the stored snapshot:
//!
//! 1. a row younger than the TTL is served as-is, no fetch
//! 2. outside the active hours the stored row is served however old it
//!    is, or an empty placeholder when no row exists yet
//! 3. inside the active hours a stale or missing row triggers one
//!    upstream fetch; the result is stored and served
//! 4. if that fetch fails, the stale row is served untouched; only a
//!    failure with nothing stored at all becomes an error response
//!
//! The ladder runs against civil time in the station's timezone, so the
//! active hours track the clock on the platform, not UTC. Concurrent
//! refreshes collapse onto one in-flight fetch per process; whoever wins
//! writes the row and the others serve it.

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::station::Crs;
use crate::store::{CacheEntry, SnapshotStore};
use crate::timetable::{DepartureSource, Snapshot, TimetableError, normalize_timetable};

/// Store key of the departures snapshot row.
const DEFAULT_CACHE_KEY: &str = "train-departures";

/// Station name used when the upstream response does not carry one.
const DEFAULT_STATION_NAME: &str = "Pembrey & Burry Port";

/// Default snapshot TTL in minutes.
const DEFAULT_TTL_MINS: i64 = 60;

/// Default active hours, local time: refresh from 06:00 up to 21:00.
const DEFAULT_START_HOUR: u32 = 6;
const DEFAULT_END_HOUR: u32 = 21;

/// Default cap on departures kept per snapshot.
const DEFAULT_MAX_DEPARTURES: usize = 10;

/// Error returned when constructing an [`ActiveWindow`] from
/// out-of-range hours.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("active window hours out of range: {start_hour}..{end_hour}")]
pub struct InvalidWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Daily hour range during which the snapshot may be refreshed.
///
/// Half-open: an hour is inside the window when `start <= hour < end`.
/// A window with `start > end` wraps past midnight; `start == end` is
/// a window that never opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    start_hour: u32,
    end_hour: u32,
}

impl ActiveWindow {
    /// Create a window from local hours. `end_hour` may be 24, meaning
    /// the window runs to midnight.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, InvalidWindow> {
        if start_hour >= 24 || end_hour > 24 {
            return Err(InvalidWindow {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Whether the given local hour falls inside the window.
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    /// First hour inside the window.
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// First hour past the window.
    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }
}

impl Default for ActiveWindow {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

/// Configuration for the snapshot service.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Store key the departures row lives under
    pub cache_key: String,
    /// Station the board is fetched for
    pub station: Crs,
    /// Fallback station name for normalization and placeholders
    pub station_name: String,
    /// Row TTL in minutes
    pub ttl_mins: i64,
    /// Local hours during which refreshes are allowed
    pub window: ActiveWindow,
    /// Timezone the window is evaluated in
    pub timezone: Tz,
    /// Departures kept per snapshot
    pub max_departures: usize,
}

impl SnapshotConfig {
    /// Create a config with the deployment defaults.
    pub fn new() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            station: Crs::PBY,
            station_name: DEFAULT_STATION_NAME.to_string(),
            ttl_mins: DEFAULT_TTL_MINS,
            window: ActiveWindow::default(),
            timezone: chrono_tz::Europe::London,
            max_departures: DEFAULT_MAX_DEPARTURES,
        }
    }

    /// Set the store key.
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    /// Set the station and its fallback display name.
    pub fn with_station(mut self, station: Crs, name: impl Into<String>) -> Self {
        self.station = station;
        self.station_name = name.into();
        self
    }

    /// Set the row TTL in minutes.
    pub fn with_ttl_mins(mut self, mins: i64) -> Self {
        self.ttl_mins = mins;
        self
    }

    /// Set the active window.
    pub fn with_window(mut self, window: ActiveWindow) -> Self {
        self.window = window;
        self
    }

    /// Set the timezone the window is evaluated in.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Set the cap on departures kept per snapshot.
    pub fn with_max_departures(mut self, n: usize) -> Self {
        self.max_departures = n;
        self
    }

    /// Row TTL as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_mins)
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How a snapshot response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Stored row within its TTL
    Cached,
    /// Fetched from upstream just now
    Refreshed,
    /// Stored row past its TTL, served because the refresh failed
    StaleOnError,
    /// Stored row past its TTL, served because the window is closed
    WindowClosed,
    /// Empty board; nothing stored and no refresh allowed
    Placeholder,
}

/// A snapshot payload plus how it was obtained.
#[derive(Debug, Clone)]
pub struct SnapshotResponse {
    /// The JSON payload, exactly as stored or just normalized.
    pub payload: serde_json::Value,
    pub served: Served,
}

/// Errors a snapshot request can surface to the caller.
///
/// Store failures never appear here: a broken store degrades to
/// fetching more often, not to failing the endpoint.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// No timetable credentials were configured at startup
    #[error("timetable credentials not configured")]
    MissingCredentials,

    /// Upstream fetch failed with nothing stored to fall back on
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] TimetableError),

    /// Normalized snapshot could not be serialized
    #[error("snapshot serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// The snapshot cache service.
///
/// `source` is `None` when the server started without credentials; the
/// server still runs (the other endpoints work) but departure requests
/// fail until credentials are provided and the server restarted.
pub struct SnapshotService<S: DepartureSource, T: SnapshotStore> {
    source: Option<S>,
    store: T,
    config: SnapshotConfig,
    /// Collapses concurrent refreshes onto one upstream fetch.
    refresh_lock: Mutex<()>,
}

impl<S: DepartureSource, T: SnapshotStore> SnapshotService<S, T> {
    /// Create a new snapshot service.
    pub fn new(source: Option<S>, store: T, config: SnapshotConfig) -> Self {
        Self {
            source,
            store,
            config,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Serve the departures snapshot for the current wall-clock time.
    pub async fn snapshot(&self) -> Result<SnapshotResponse, SnapshotError> {
        self.snapshot_at(Utc::now()).await
    }

    /// Serve the departures snapshot as of `now`.
    ///
    /// Split out from [`snapshot`](Self::snapshot) so the decision
    /// ladder can be exercised at fixed instants.
    pub async fn snapshot_at(&self, now: DateTime<Utc>) -> Result<SnapshotResponse, SnapshotError> {
        // Checked before the store, so a fresh row cannot mask a
        // misconfigured deployment.
        let source = self
            .source
            .as_ref()
            .ok_or(SnapshotError::MissingCredentials)?;

        let existing = self.read_entry().await;

        if let Some(entry) = &existing
            && entry.is_fresh(now, self.config.ttl())
        {
            return Ok(SnapshotResponse {
                payload: entry.payload.clone(),
                served: Served::Cached,
            });
        }

        if !self.in_active_window(now) {
            return match existing {
                Some(entry) => Ok(SnapshotResponse {
                    payload: entry.payload,
                    served: Served::WindowClosed,
                }),
                // Not stored: the placeholder is recomputed per request
                // until the window next opens.
                None => {
                    let placeholder =
                        Snapshot::empty(&self.config.station_name, &self.config.station);
                    Ok(SnapshotResponse {
                        payload: serde_json::to_value(&placeholder)?,
                        served: Served::Placeholder,
                    })
                }
            };
        }

        self.refresh(source, now).await
    }

    /// Refresh the snapshot from upstream, serializing concurrent
    /// attempts.
    async fn refresh(&self, source: &S, now: DateTime<Utc>) -> Result<SnapshotResponse, SnapshotError> {
        let _guard = self.refresh_lock.lock().await;

        // A request that waited on the lock sees the winner's row here
        // and serves it instead of fetching again.
        let existing = self.read_entry().await;
        if let Some(entry) = &existing
            && entry.is_fresh(now, self.config.ttl())
        {
            return Ok(SnapshotResponse {
                payload: entry.payload.clone(),
                served: Served::Cached,
            });
        }

        match source.fetch_timetable(&self.config.station).await {
            Ok(raw) => {
                let snapshot = normalize_timetable(
                    &raw,
                    &self.config.station_name,
                    &self.config.station,
                    self.config.max_departures,
                );
                let payload = serde_json::to_value(&snapshot)?;

                let entry = CacheEntry {
                    key: self.config.cache_key.clone(),
                    payload: payload.clone(),
                    updated_at: now,
                };
                if let Err(e) = self.store.upsert(&entry).await {
                    warn!(error = %e, "Failed to persist refreshed snapshot");
                }

                debug!(
                    departures = snapshot.departures.all.len(),
                    "Refreshed departures snapshot"
                );
                Ok(SnapshotResponse {
                    payload,
                    served: Served::Refreshed,
                })
            }
            Err(fetch_err) => match existing {
                // The stale row stays exactly as it was; its timestamp
                // keeps later requests retrying upstream.
                Some(entry) => {
                    warn!(error = %fetch_err, "Upstream fetch failed, serving stale snapshot");
                    Ok(SnapshotResponse {
                        payload: entry.payload,
                        served: Served::StaleOnError,
                    })
                }
                None => Err(SnapshotError::Upstream(fetch_err)),
            },
        }
    }

    /// Read the snapshot row, treating store failure as absence.
    ///
    /// A flaky store must not take the endpoint down; at worst it costs
    /// an extra upstream fetch.
    async fn read_entry(&self) -> Option<CacheEntry> {
        match self.store.get(&self.config.cache_key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Snapshot store read failed, treating as missing");
                None
            }
        }
    }

    fn in_active_window(&self, now: DateTime<Utc>) -> bool {
        let local_hour = now.with_timezone(&self.config.timezone).hour();
        self.config.window.contains(local_hour)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The number of open hours equals the window's span, wrapped
        /// or not.
        #[test]
        fn window_spans_expected_hours(start in 0u32..24, end in 0u32..=24) {
            let window = ActiveWindow::new(start, end).unwrap();
            let open_hours = (0..24).filter(|&h| window.contains(h)).count() as u32;

            let expected = if start <= end { end - start } else { 24 - start + end };
            prop_assert_eq!(open_hours, expected);
        }

        /// Non-wrapped windows agree with a plain range check.
        #[test]
        fn plain_window_matches_range(start in 0u32..24, span in 0u32..12, hour in 0u32..24) {
            let end = (start + span).min(24);
            let window = ActiveWindow::new(start, end).unwrap();

            prop_assert_eq!(window.contains(hour), (start..end).contains(&hour));
        }
    }
}
