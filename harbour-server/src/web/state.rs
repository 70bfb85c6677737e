//! Application state for the web layer.

use std::sync::Arc;

use crate::snapshot::SnapshotService;
use crate::store::Store;
use crate::timetable::DepartureSource;

/// Shared application state.
///
/// Contains the snapshot service plus direct store access for the
/// auxiliary payload routes.
pub struct AppState<S: DepartureSource> {
    /// Departure snapshot service
    pub snapshots: Arc<SnapshotService<S, Store>>,

    /// Persistent cache, read directly for tides and weather payloads
    pub store: Store,

    /// max-age advertised in Cache-Control response headers
    pub cache_max_age_secs: u32,
}

impl<S: DepartureSource> AppState<S> {
    /// Create a new app state.
    pub fn new(snapshots: SnapshotService<S, Store>, store: Store, cache_max_age_secs: u32) -> Self {
        Self {
            snapshots: Arc::new(snapshots),
            store,
            cache_max_age_secs,
        }
    }
}

// Manual impl: the source behind the Arc does not need to be Clone.
impl<S: DepartureSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            snapshots: Arc::clone(&self.snapshots),
            store: self.store.clone(),
            cache_max_age_secs: self.cache_max_age_secs,
        }
    }
}
