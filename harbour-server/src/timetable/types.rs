//! TransportAPI response DTOs.
//!
//! These types map directly to the station timetable JSON responses.
//! Every field the provider has ever been seen to omit is an `Option`:
//! a response that parses at the top level must never fail the request
//! because of a missing inner field.

use serde::{Deserialize, Serialize};

/// Response from `/uk/train/station/{crs}/timetable.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    /// Date the board was generated for (YYYY-MM-DD).
    pub date: Option<String>,

    /// Time of day the board was generated for (HH:MM).
    pub time_of_day: Option<String>,

    /// When the provider handled the request (ISO 8601).
    pub request_time: Option<String>,

    /// Human-readable station name.
    pub station_name: Option<String>,

    /// CRS code of the station.
    pub station_code: Option<String>,

    /// Departure listings, grouped by filter.
    pub departures: Option<DeparturesBlock>,
}

/// The `departures` object; only the unfiltered `all` group is used.
#[derive(Debug, Clone, Deserialize)]
pub struct DeparturesBlock {
    /// All departures, soonest first.
    pub all: Option<Vec<TimetableDeparture>>,
}

/// A single departure row on the timetable board.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableDeparture {
    /// Transport mode (always "train" for this endpoint).
    pub mode: Option<String>,

    /// Provider service identifier.
    pub service: Option<String>,

    /// Network Rail train UID.
    pub train_uid: Option<String>,

    /// Platform; the provider sends either a string or a bare number.
    pub platform: Option<Platform>,

    /// Operator ATOC code (e.g. "AW").
    pub operator: Option<String>,

    /// Operator display name.
    pub operator_name: Option<String>,

    /// Scheduled departure time (HH:MM).
    pub aimed_departure_time: Option<String>,

    /// Scheduled arrival time (HH:MM).
    pub aimed_arrival_time: Option<String>,

    /// Live expected departure, only present on the live endpoint.
    /// Deliberately dropped during normalization.
    pub expected_departure_time: Option<String>,

    /// Per-service status from the live endpoint ("ON TIME", "LATE", ...).
    /// Deliberately dropped during normalization.
    pub status: Option<String>,

    /// Name of the origin station.
    pub origin_name: Option<String>,

    /// Name of the destination station.
    pub destination_name: Option<String>,
}

/// Platform designator: "1", "2B", or a bare number, depending on feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Platform {
    Text(String),
    Number(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_timetable_response() {
        let json = r#"{
            "date": "2026-03-10",
            "time_of_day": "10:00",
            "request_time": "2026-03-10T10:00:12+00:00",
            "station_name": "Pembrey and Burry Port",
            "station_code": "PBY",
            "departures": {
                "all": [
                    {
                        "mode": "train",
                        "service": "24571004",
                        "train_uid": "W90123",
                        "platform": "1",
                        "operator": "AW",
                        "operator_name": "Transport for Wales",
                        "aimed_departure_time": "10:12",
                        "aimed_arrival_time": "10:11",
                        "origin_name": "Swansea",
                        "destination_name": "Pembroke Dock"
                    }
                ]
            }
        }"#;

        let response: TimetableResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.station_name.as_deref(), Some("Pembrey and Burry Port"));
        assert_eq!(response.station_code.as_deref(), Some("PBY"));
        assert_eq!(response.date.as_deref(), Some("2026-03-10"));

        let all = response.departures.unwrap().all.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].aimed_departure_time.as_deref(), Some("10:12"));
        assert_eq!(all[0].destination_name.as_deref(), Some("Pembroke Dock"));
        assert_eq!(all[0].platform, Some(Platform::Text("1".to_string())));
    }

    #[test]
    fn deserialize_numeric_platform() {
        let json = r#"{"platform": 2, "destination_name": "Swansea"}"#;
        let departure: TimetableDeparture = serde_json::from_str(json).unwrap();
        assert_eq!(departure.platform, Some(Platform::Number(2)));
    }

    #[test]
    fn deserialize_null_platform() {
        let json = r#"{"platform": null, "destination_name": "Swansea"}"#;
        let departure: TimetableDeparture = serde_json::from_str(json).unwrap();
        assert_eq!(departure.platform, None);
    }

    #[test]
    fn deserialize_sparse_response() {
        // Everything optional: a bare object is still a valid response.
        let response: TimetableResponse = serde_json::from_str("{}").unwrap();
        assert!(response.station_name.is_none());
        assert!(response.departures.is_none());
    }

    #[test]
    fn deserialize_live_endpoint_fields() {
        let json = r#"{
            "aimed_departure_time": "10:12",
            "expected_departure_time": "10:15",
            "status": "LATE",
            "destination_name": "Pembroke Dock"
        }"#;

        let departure: TimetableDeparture = serde_json::from_str(json).unwrap();
        assert_eq!(departure.expected_departure_time.as_deref(), Some("10:15"));
        assert_eq!(departure.status.as_deref(), Some("LATE"));
    }

    #[test]
    fn platform_serializes_back_to_original_shape() {
        assert_eq!(
            serde_json::to_string(&Platform::Text("2B".to_string())).unwrap(),
            "\"2B\""
        );
        assert_eq!(serde_json::to_string(&Platform::Number(3)).unwrap(), "3");
    }
}
