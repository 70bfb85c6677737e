//! Tide ingest error types.

use crate::store::StoreError;

/// Errors from fetching, parsing, or storing tide predictions.
#[derive(Debug, thiserror::Error)]
pub enum TideError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed host returned a non-success status
    #[error("feed error {status}: {message}")]
    Api { status: u16, message: String },

    /// Store rejected the refreshed payload
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Payload serialization failed
    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}
