//! Mock departure source for testing without TransportAPI access.
//!
//! Serves a programmable timetable response as if it were a live API
//! response, and counts how often it is asked. Useful for development
//! and testing without real credentials, and for exercising the
//! snapshot service's refresh decisions.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::station::Crs;

use super::client::DepartureSource;
use super::error::TimetableError;
use super::types::TimetableResponse;

/// Outcome the mock will serve: a board, or an API failure to replay.
type MockOutcome = Result<TimetableResponse, (u16, String)>;

/// Mock departure source serving canned data.
///
/// Clones share the same board and call counter, so a test can hand one
/// clone to the service under test and keep another to reprogram it or
/// inspect how many fetches happened.
#[derive(Clone)]
pub struct MockDepartureSource {
    outcome: Arc<RwLock<MockOutcome>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockDepartureSource {
    /// Mock that serves the given board on every fetch.
    pub fn serving(board: TimetableResponse) -> Self {
        Self {
            outcome: Arc::new(RwLock::new(Ok(board))),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Mock that fails every fetch with an API error.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            outcome: Arc::new(RwLock::new(Err((status, message.into())))),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Delay each fetch, to hold a refresh in flight while another
    /// request arrives.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the served board.
    pub async fn set_board(&self, board: TimetableResponse) {
        *self.outcome.write().await = Ok(board);
    }

    /// Make subsequent fetches fail with an API error.
    pub async fn set_failure(&self, status: u16, message: impl Into<String>) {
        *self.outcome.write().await = Err((status, message.into()));
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DepartureSource for MockDepartureSource {
    async fn fetch_timetable(
        &self,
        _station: &Crs,
    ) -> Result<TimetableResponse, TimetableError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.outcome.read().await.clone();
        outcome.map_err(|(status, message)| TimetableError::Api { status, message })
    }
}

/// A small plausible Pembrey & Burry Port board for development use.
pub fn sample_board() -> TimetableResponse {
    serde_json::from_value(serde_json::json!({
        "date": "2026-03-10",
        "time_of_day": "10:00",
        "station_name": "Pembrey and Burry Port",
        "station_code": "PBY",
        "departures": {
            "all": [
                {
                    "mode": "train",
                    "service": "24673109",
                    "train_uid": "P03321",
                    "platform": "1",
                    "operator": "AW",
                    "operator_name": "Transport for Wales",
                    "aimed_departure_time": "10:14",
                    "destination_name": "Swansea"
                },
                {
                    "mode": "train",
                    "service": "24673214",
                    "train_uid": "P03358",
                    "platform": "2",
                    "operator": "AW",
                    "operator_name": "Transport for Wales",
                    "aimed_departure_time": "10:47",
                    "destination_name": "Pembroke Dock"
                }
            ]
        }
    }))
    .expect("sample board is valid")
}
