//! Environment configuration.
//!
//! Everything is read once at startup. Absent or malformed values fall
//! back to the built-in defaults with a warning rather than aborting;
//! the only hard requirement is a usable store, and the disk backend
//! guarantees that.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

use crate::snapshot::{ActiveWindow, SnapshotConfig};
use crate::station::Crs;

/// Default HTTP bind port.
const DEFAULT_PORT: u16 = 3000;

/// Default Cache-Control max-age in seconds.
const DEFAULT_CACHE_MAX_AGE_SECS: u32 = 300;

/// Default disk store path when no REST store is configured.
const DEFAULT_DISK_PATH: &str = "data/snapshot-cache.json";

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Snapshot service parameters
    pub snapshot: SnapshotConfig,

    /// HTTP listener parameters
    pub http: HttpConfig,

    /// TransportAPI credentials, when configured
    pub transport: Option<TransportCredentials>,

    /// Which store backend to use
    pub store: StoreSettings,

    /// OpenWeatherMap credentials and coordinates, when configured
    pub weather: Option<WeatherSettings>,

    /// Override for the tide feed URL
    pub tide_feed_url: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Port to bind on
    pub port: u16,

    /// max-age advertised in Cache-Control response headers
    pub cache_max_age_secs: u32,

    /// CORS origins to allow; empty means any origin
    pub allowed_origins: Vec<String>,
}

/// TransportAPI credentials.
#[derive(Debug, Clone)]
pub struct TransportCredentials {
    pub app_id: String,
    pub app_key: String,
}

/// Which backend holds the snapshot rows.
#[derive(Debug, Clone)]
pub enum StoreSettings {
    /// PostgREST-style endpoint with a service key
    Rest { url: String, service_key: String },

    /// Single JSON file on local disk
    Disk { path: String },
}

/// OpenWeatherMap credentials and forecast coordinates.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub api_key: String,
    pub lat: f64,
    pub lon: f64,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// Credential groups that are absent come back as `None`; the
    /// corresponding feature degrades at runtime instead of blocking
    /// startup.
    pub fn from_env() -> Self {
        Self {
            snapshot: snapshot_from_env(),
            http: HttpConfig {
                port: try_load("PORT", DEFAULT_PORT),
                cache_max_age_secs: try_load("CACHE_MAX_AGE_SECS", DEFAULT_CACHE_MAX_AGE_SECS),
                allowed_origins: split_origins(env::var("CORS_ALLOW_ORIGINS").ok()),
            },
            transport: transport_from_env(),
            store: store_from_env(),
            weather: weather_from_env(),
            tide_feed_url: env::var("TIDE_FEED_URL").ok(),
        }
    }
}

/// Snapshot parameters, starting from the reference defaults.
fn snapshot_from_env() -> SnapshotConfig {
    let mut config = SnapshotConfig::new();

    if let Ok(raw) = env::var("STATION_CODE") {
        match Crs::parse(&raw) {
            Ok(crs) => config.station = crs,
            Err(e) => warn!(error = %e, "Invalid STATION_CODE, keeping default"),
        }
    }

    if let Ok(name) = env::var("STATION_NAME") {
        config.station_name = name;
    }

    config.ttl_mins = try_load("SNAPSHOT_TTL_MINS", config.ttl_mins);
    config.max_departures = try_load("MAX_DEPARTURES", config.max_departures);

    let start = try_load("ACTIVE_START_HOUR", config.window.start_hour());
    let end = try_load("ACTIVE_END_HOUR", config.window.end_hour());
    match ActiveWindow::new(start, end) {
        Ok(window) => config.window = window,
        Err(e) => warn!(error = %e, "Invalid active window, keeping default"),
    }

    if let Ok(raw) = env::var("TIMEZONE") {
        match raw.parse::<chrono_tz::Tz>() {
            Ok(tz) => config.timezone = tz,
            Err(e) => warn!(error = %e, "Invalid TIMEZONE, keeping default"),
        }
    }

    config
}

fn transport_from_env() -> Option<TransportCredentials> {
    match (env::var("TRANSPORT_APP_ID"), env::var("TRANSPORT_APP_KEY")) {
        (Ok(app_id), Ok(app_key)) => Some(TransportCredentials { app_id, app_key }),
        _ => {
            warn!("TRANSPORT_APP_ID / TRANSPORT_APP_KEY not set, departures will answer 500");
            None
        }
    }
}

fn store_from_env() -> StoreSettings {
    if let (Ok(url), Ok(service_key)) = (env::var("STORE_URL"), env::var("STORE_SERVICE_KEY")) {
        return StoreSettings::Rest { url, service_key };
    }

    let path = env::var("SNAPSHOT_DISK_PATH").unwrap_or_else(|_| DEFAULT_DISK_PATH.to_string());
    warn!(path = %path, "No REST store configured, using disk store");
    StoreSettings::Disk { path }
}

fn weather_from_env() -> Option<WeatherSettings> {
    let settings = (|| {
        let api_key = env::var("OPENWEATHER_API_KEY").ok()?;
        let lat = env::var("OPENWEATHER_LAT").ok()?.parse().ok()?;
        let lon = env::var("OPENWEATHER_LON").ok()?.parse().ok()?;
        Some(WeatherSettings { api_key, lat, lon })
    })();

    if settings.is_none() {
        warn!("OpenWeatherMap settings incomplete, weather refresh disabled");
    }

    settings
}

/// Parse a variable, logging and falling back on bad values.
fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, default = %default, "Invalid value, using default");
            default
        }
    }
}

/// Split a comma-separated origin list, dropping empty pieces.
fn split_origins(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
