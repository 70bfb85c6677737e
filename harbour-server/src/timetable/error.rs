//! Timetable client error types.

/// Errors from the timetable HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials rejected by the provider
    #[error("unauthorized: check TRANSPORT_APP_ID and TRANSPORT_APP_KEY")]
    Unauthorized,

    /// Request budget exhausted upstream
    #[error("rate limited by timetable API")]
    RateLimited,

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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TimetableError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = TimetableError::RateLimited;
        assert_eq!(err.to_string(), "rate limited by timetable API");

        let err = TimetableError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }
}
