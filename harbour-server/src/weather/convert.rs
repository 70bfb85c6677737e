//! Conversion of forecast responses into the stored payload.
//!
//! Field names follow the site's weather table. An item missing its
//! time, main block, conditions, or wind block is dropped whole; the
//! remaining fields go to null (or zero where the site expects a
//! number) rather than dropping the item.

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use super::types::ForecastResponse;

/// One stored forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Forecast time, RFC 3339 UTC with a `Z` suffix.
    pub forecast_time: String,
    pub temp_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub pressure_hpa: Option<i64>,
    pub humidity_percent: Option<i64>,
    pub weather_main: Option<String>,
    pub weather_description: Option<String>,
    pub weather_icon: Option<String>,
    pub wind_speed_mps: f64,
    pub wind_deg: Option<i64>,
    pub visibility_m: Option<i64>,
    /// Probability of precipitation, 0.00 to 1.00.
    pub rain_prob: f64,
}

/// Payload stored under the weather key and served by the weather
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub forecast: Vec<ForecastEntry>,
}

/// Convert an upstream forecast into stored entries.
pub fn convert_forecast(response: &ForecastResponse) -> Vec<ForecastEntry> {
    response
        .list
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|item| {
            let dt = item.dt?;
            let main = item.main.as_ref()?;
            let conditions = item.weather.as_ref()?.first()?;
            let wind = item.wind.as_ref()?;

            let forecast_time = DateTime::from_timestamp(dt, 0)?
                .to_rfc3339_opts(SecondsFormat::Secs, true);

            Some(ForecastEntry {
                forecast_time,
                temp_c: main.temp.map(round2),
                feels_like_c: main.feels_like.map(round2),
                pressure_hpa: main.pressure,
                humidity_percent: main.humidity,
                weather_main: conditions.main.clone(),
                weather_description: conditions.description.clone(),
                weather_icon: conditions.icon.clone(),
                wind_speed_mps: round2(wind.speed.unwrap_or(0.0)),
                wind_deg: wind.deg,
                visibility_m: item.visibility,
                rain_prob: round2(item.pop.unwrap_or(0.0)),
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
