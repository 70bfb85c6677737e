//! Weather ingest error types.

use crate::store::StoreError;

/// Errors from fetching, converting, or storing the forecast.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials rejected by the provider
    #[error("unauthorized: check OPENWEATHER_API_KEY")]
    Unauthorized,

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Top-level JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        /// First part of the offending body, kept for log output.
        body: Option<String>,
    },

    /// Store rejected the refreshed payload
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Payload serialization failed
    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WeatherError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized: check OPENWEATHER_API_KEY");

        let err = WeatherError::Api {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "API error 429: quota exceeded");
    }
}
