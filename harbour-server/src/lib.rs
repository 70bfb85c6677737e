//! Harbour dashboard server for Pembrey & Burry Port.
//!
//! A small web service that fronts rate-limited third parties with a
//! persistent snapshot cache: train departures refreshed on request
//! within civil daytime hours, tide and weather payloads refreshed by
//! background loops.

pub mod config;
pub mod snapshot;
pub mod station;
pub mod store;
pub mod tides;
pub mod timetable;
pub mod weather;
pub mod web;
