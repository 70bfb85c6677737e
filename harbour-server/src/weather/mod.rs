//! Weather forecast ingest.
//!
//! Fetches the OpenWeatherMap 5-day / 3-hour forecast for the harbour
//! and stores it as one payload for the weather endpoint. Runs on a
//! schedule; the forecast changes slowly enough that a few refreshes a
//! day keep it current.

mod client;
mod convert;
mod error;
mod ingest;
mod types;

pub use client::{WeatherClient, WeatherConfig};
pub use convert::{ForecastEntry, WeatherPayload, convert_forecast};
pub use error::WeatherError;
pub use ingest::{WEATHER_CACHE_KEY, WeatherIngest};
pub use types::{ForecastItem, ForecastResponse, MainData, WeatherData, WindData};
