//! Scheduled weather refresh.

use chrono::Utc;
use tracing::warn;

use crate::store::{CacheEntry, SnapshotStore};

use super::client::WeatherClient;
use super::convert::{ForecastEntry, WeatherPayload, convert_forecast};
use super::error::WeatherError;

/// Store key of the weather row.
pub const WEATHER_CACHE_KEY: &str = "weather";

/// Fetches the forecast and keeps the stored payload current.
pub struct WeatherIngest<T: SnapshotStore> {
    client: WeatherClient,
    store: T,
}

impl<T: SnapshotStore> WeatherIngest<T> {
    /// Create a new weather ingest.
    pub fn new(client: WeatherClient, store: T) -> Self {
        Self { client, store }
    }

    /// Fetch, convert, and store the current forecast.
    ///
    /// Returns the number of forecast points stored.
    pub async fn refresh(&self) -> Result<usize, WeatherError> {
        let response = self.client.fetch_forecast().await?;
        self.store_forecast(convert_forecast(&response)).await
    }

    /// Store converted entries under the weather key.
    ///
    /// An empty conversion is a no-op so a bad upstream response never
    /// wipes the stored forecast.
    async fn store_forecast(&self, forecast: Vec<ForecastEntry>) -> Result<usize, WeatherError> {
        if forecast.is_empty() {
            warn!("Forecast converted to no entries, keeping stored payload");
            return Ok(0);
        }

        let count = forecast.len();
        let payload = serde_json::to_value(&WeatherPayload { forecast })?;

        let entry = CacheEntry {
            key: WEATHER_CACHE_KEY.to_string(),
            payload,
            updated_at: Utc::now(),
        };
        self.store.upsert(&entry).await?;

        Ok(count)
    }
}
