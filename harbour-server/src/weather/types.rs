//! OpenWeatherMap forecast response types.
//!
//! Mirrors the 5-day / 3-hour forecast endpoint. Every field is
//! optional: a partial response should degrade to fewer forecast
//! entries, not a deserialization failure.

use serde::Deserialize;

/// Top-level forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    /// Forecast points, 3 hours apart.
    pub list: Option<Vec<ForecastItem>>,
}

/// One forecast point.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItem {
    /// Forecast time as a unix timestamp (UTC).
    pub dt: Option<i64>,
    pub main: Option<MainData>,
    /// Conditions; the first element is the primary one.
    pub weather: Option<Vec<WeatherData>>,
    pub wind: Option<WindData>,
    /// Average visibility in metres, capped upstream at 10 km.
    pub visibility: Option<i64>,
    /// Probability of precipitation, 0 to 1.
    pub pop: Option<f64>,
}

/// Temperature, pressure, and humidity block.
#[derive(Debug, Clone, Deserialize)]
pub struct MainData {
    /// Temperature in Celsius (`units=metric`).
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    /// Pressure in hPa.
    pub pressure: Option<i64>,
    /// Humidity in percent.
    pub humidity: Option<i64>,
}

/// Condition summary block.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherData {
    /// Condition group, e.g. "Clouds", "Rain".
    pub main: Option<String>,
    /// Condition detail, e.g. "overcast clouds".
    pub description: Option<String>,
    /// Icon id, e.g. "04d".
    pub icon: Option<String>,
}

/// Wind block.
#[derive(Debug, Clone, Deserialize)]
pub struct WindData {
    /// Speed in m/s (`units=metric`).
    pub speed: Option<f64>,
    /// Direction in degrees.
    pub deg: Option<i64>,
}
