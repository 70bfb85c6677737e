//! TransportAPI timetable HTTP client.
//!
//! Fetches the scheduled departure board for a station. The timetable
//! endpoint carries no live running data; it is chosen precisely because
//! it is cheap and cacheable.

use std::future::Future;

use crate::station::Crs;

use super::error::TimetableError;
use super::types::TimetableResponse;

/// Default base URL for TransportAPI.
const DEFAULT_BASE_URL: &str = "https://transportapi.com/v3";

/// Default request timeout in seconds. Kept short: a caller is waiting
/// on this fetch, and a stored snapshot usually exists as fallback.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Application id, sent as the `app_id` query parameter
    pub app_id: String,
    /// Application key, sent as the `app_key` query parameter
    pub app_key: String,
    /// Base URL for the API (defaults to production TransportAPI)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TimetableConfig {
    /// Create a new config with the given credentials.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Source of departure boards.
///
/// The snapshot service only needs "give me the current board for this
/// station"; this seam lets tests and credential-free development drive
/// it with a scripted source instead of the real provider.
pub trait DepartureSource {
    /// Fetch the timetable board for a station.
    fn fetch_timetable(
        &self,
        station: &Crs,
    ) -> impl Future<Output = Result<TimetableResponse, TimetableError>> + Send;
}

/// TransportAPI timetable client.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl TimetableClient {
    /// Create a new timetable client with the given configuration.
    pub fn new(config: TimetableConfig) -> Result<Self, TimetableError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            app_id: config.app_id,
            app_key: config.app_key,
        })
    }

    /// URL of the timetable endpoint for a station.
    fn board_url(&self, station: &Crs) -> String {
        format!(
            "{}/uk/train/station/{}/timetable.json",
            self.base_url,
            station.as_str()
        )
    }
}

impl DepartureSource for TimetableClient {
    async fn fetch_timetable(&self, station: &Crs) -> Result<TimetableResponse, TimetableError> {
        let response = self
            .http
            .get(self.board_url(station))
            .query(&[
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
                ("train_status", "passenger"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TimetableError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TimetableError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TimetableError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TimetableError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
