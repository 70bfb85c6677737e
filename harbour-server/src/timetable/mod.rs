//! TransportAPI train timetable client.
//!
//! This module provides an HTTP client for the TransportAPI station
//! timetable endpoint, which serves scheduled (not live) departures.
//!
//! Key characteristics of the endpoint:
//! - Free-plan quotas are tight, so callers are expected to cache
//!   aggressively rather than fetch per request
//! - Times are in "HH:MM" format (UK local time)
//! - `platform` arrives as either a string or a number depending on
//!   the data source behind a given station
//! - There is no live running data; the snapshot layer stamps every
//!   row "Scheduled"

mod client;
mod convert;
mod error;
pub mod mock;
mod types;

pub use client::{DepartureSource, TimetableClient, TimetableConfig};
pub use convert::{
    DepartureBoard, DepartureEntry, SCHEDULED_STATUS, Snapshot, StationSummary,
    normalize_timetable,
};
pub use error::TimetableError;
pub use types::{DeparturesBlock, Platform, TimetableDeparture, TimetableResponse};
