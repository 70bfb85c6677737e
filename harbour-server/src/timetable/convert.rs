//! Normalization of timetable responses into the stable snapshot payload.
//!
//! The payload shape is a published contract with the site front end and
//! must stay byte-for-byte reproducible: the same upstream response always
//! normalizes to the same JSON. Normalization also strips everything the
//! front end does not render, so a provider-side field change cannot leak
//! into stored snapshots.

use serde::{Deserialize, Serialize};

use crate::station::Crs;

use super::types::{Platform, TimetableResponse};

/// Status string stamped on every normalized departure. The timetable
/// endpoint has no live running data, so no entry can honestly claim
/// anything else.
pub const SCHEDULED_STATUS: &str = "Scheduled";

/// The normalized snapshot payload served to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub station: StationSummary,
    pub departures: DepartureBoard,
}

/// Station header of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub name: String,
    pub crs: String,
    pub date: Option<String>,
    pub time_of_day: Option<String>,
}

/// Departure listing of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureBoard {
    pub all: Vec<DepartureEntry>,
}

/// One normalized departure row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureEntry {
    pub aimed_departure_time: Option<String>,
    /// Always null: the live/expected field is discarded on purpose,
    /// it is not fetched from the timetable endpoint.
    pub expected_departure_time: Option<String>,
    pub destination_name: Option<String>,
    pub platform: Option<Platform>,
    pub status: String,
}

impl Snapshot {
    /// The structurally-valid empty snapshot: station defaults, no rows.
    ///
    /// Served before the first successful refresh so early callers get
    /// the same shape they would for a quiet board.
    pub fn empty(station_name: &str, station: &Crs) -> Self {
        Self {
            station: StationSummary {
                name: station_name.to_string(),
                crs: station.as_str().to_string(),
                date: None,
                time_of_day: None,
            },
            departures: DepartureBoard { all: Vec::new() },
        }
    }
}

/// Normalize an upstream timetable response.
///
/// Rules, fixed for compatibility with stored snapshots:
/// - station name/code fall back to the configured defaults when absent
/// - the list is truncated to the first `max_entries` rows, upstream order
/// - `expected_departure_time` is always null and `status` is always
///   [`SCHEDULED_STATUS`], whatever upstream sent
/// - missing per-row fields stay null rather than failing the response
pub fn normalize_timetable(
    raw: &TimetableResponse,
    default_name: &str,
    default_crs: &Crs,
    max_entries: usize,
) -> Snapshot {
    let station = StationSummary {
        name: raw
            .station_name
            .clone()
            .unwrap_or_else(|| default_name.to_string()),
        crs: raw
            .station_code
            .clone()
            .unwrap_or_else(|| default_crs.as_str().to_string()),
        date: raw.date.clone(),
        time_of_day: raw.time_of_day.clone(),
    };

    let all = raw
        .departures
        .as_ref()
        .and_then(|block| block.all.as_deref())
        .unwrap_or_default()
        .iter()
        .take(max_entries)
        .map(|row| DepartureEntry {
            aimed_departure_time: row.aimed_departure_time.clone(),
            expected_departure_time: None,
            destination_name: row.destination_name.clone(),
            platform: row.platform.clone(),
            status: SCHEDULED_STATUS.to_string(),
        })
        .collect();

    Snapshot {
        station,
        departures: DepartureBoard { all },
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn raw_with_times(times: &[String]) -> TimetableResponse {
        let rows: Vec<serde_json::Value> = times
            .iter()
            .map(|t| serde_json::json!({ "aimed_departure_time": t }))
            .collect();
        serde_json::from_value(serde_json::json!({ "departures": { "all": rows } })).unwrap()
    }

    proptest! {
        /// The normalized list is always the first min(n, max) upstream
        /// rows, in upstream order.
        #[test]
        fn truncation_keeps_prefix(times in proptest::collection::vec("[0-2][0-9]:[0-5][0-9]", 0..30), max in 0usize..15) {
            let crs = Crs::parse("PBY").unwrap();
            let raw = raw_with_times(&times);

            let snapshot = normalize_timetable(&raw, "Pembrey & Burry Port", &crs, max);

            prop_assert_eq!(snapshot.departures.all.len(), times.len().min(max));
            for (row, time) in snapshot.departures.all.iter().zip(&times) {
                prop_assert_eq!(row.aimed_departure_time.as_deref(), Some(time.as_str()));
            }
        }

        /// Every normalized row carries the fixed status and a null
        /// expected time, whatever upstream said.
        #[test]
        fn status_fields_are_fixed(times in proptest::collection::vec("[0-2][0-9]:[0-5][0-9]", 0..12)) {
            let crs = Crs::parse("PBY").unwrap();
            let raw = raw_with_times(&times);

            let snapshot = normalize_timetable(&raw, "Pembrey & Burry Port", &crs, 10);

            for row in &snapshot.departures.all {
                prop_assert_eq!(row.status.as_str(), SCHEDULED_STATUS);
                prop_assert_eq!(row.expected_departure_time.as_deref(), None);
            }
        }
    }
}
