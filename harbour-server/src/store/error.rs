//! Store backend error types.

/// Errors from a snapshot store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// REST backend returned a non-success status
    #[error("store API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Row (de)serialization failed
    #[error("store serialization error: {message}")]
    Serde { message: String },

    /// Disk backend could not read or write its file
    #[error("store I/O error: {message}")]
    Io { message: String },
}
