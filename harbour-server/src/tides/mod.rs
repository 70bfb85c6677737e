//! Tide prediction ingest.
//!
//! Fetches predicted high/low tides for the harbour from the
//! tidetimes.org.uk RSS feed and stores them as one payload for the
//! tides endpoint. Predictions cover about a week, so a daily refresh
//! keeps plenty of margin.

mod client;
mod error;
mod ingest;
mod parse;

pub use client::{TideFeedClient, TideFeedConfig};
pub use error::TideError;
pub use ingest::{TIDES_CACHE_KEY, TideIngest};
pub use parse::{TideEvent, TideType, TidesPayload, parse_feed};
