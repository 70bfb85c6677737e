//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

/// Query parameters for the departures snapshot route.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    /// Any non-empty value turns the request into a keep-alive ping
    pub ping: Option<String>,
}

impl SnapshotQuery {
    /// Whether this request is a keep-alive ping.
    ///
    /// `?ping=` with an empty value does not count; anything else does,
    /// including `?ping=0`.
    pub fn is_ping(&self) -> bool {
        self.ping.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Response to a keep-alive ping.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    /// Always true
    pub ok: bool,

    /// Server time in unix milliseconds
    pub ts: i64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
