//! Tide prediction feed HTTP client.
//!
//! tidetimes.org.uk publishes a stable RSS feed of predicted tides for
//! the harbour, one item per day, about a week ahead. No credentials
//! are needed.

use super::error::TideError;

/// Default feed URL for Burry Port.
const DEFAULT_FEED_URL: &str = "https://www.tidetimes.org.uk/burry-port-tide-times.rss";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for the tide feed client.
#[derive(Debug, Clone)]
pub struct TideFeedConfig {
    /// Feed URL (defaults to the Burry Port feed)
    pub feed_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TideFeedConfig {
    /// Create a config with the default feed.
    pub fn new() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom feed URL.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TideFeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tide feed client.
#[derive(Debug, Clone)]
pub struct TideFeedClient {
    http: reqwest::Client,
    feed_url: String,
}

impl TideFeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: TideFeedConfig) -> Result<Self, TideError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            feed_url: config.feed_url,
        })
    }

    /// Fetch the raw feed XML.
    pub async fn fetch_feed(&self) -> Result<String, TideError> {
        let response = self.http.get(&self.feed_url).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TideError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.text().await?)
    }
}
