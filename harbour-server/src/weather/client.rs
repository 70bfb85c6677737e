//! OpenWeatherMap forecast HTTP client.

use super::error::WeatherError;
use super::types::ForecastResponse;

/// Default base URL for OpenWeatherMap.
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the weather client.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// API key, sent as the `appid` query parameter
    pub api_key: String,
    /// Forecast point latitude
    pub lat: f64,
    /// Forecast point longitude
    pub lon: f64,
    /// Base URL for the API (defaults to production OpenWeatherMap)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WeatherConfig {
    /// Create a new config for the given key and location.
    pub fn new(api_key: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            api_key: api_key.into(),
            lat,
            lon,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenWeatherMap client for the 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    lat: f64,
    lon: f64,
}

impl WeatherClient {
    /// Create a new weather client with the given configuration.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            lat: config.lat,
            lon: config.lon,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    /// Fetch the forecast for the configured location.
    ///
    /// `units=metric` keeps temperatures in Celsius and wind in m/s,
    /// which the stored payload assumes.
    pub async fn fetch_forecast(&self) -> Result<ForecastResponse, WeatherError> {
        let response = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("lat", self.lat.to_string()),
                ("lon", self.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(WeatherError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| WeatherError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
