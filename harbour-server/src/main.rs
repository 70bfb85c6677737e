use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use harbour_server::config::{AppConfig, StoreSettings};
use harbour_server::snapshot::SnapshotService;
use harbour_server::store::{DiskStore, RestStore, RestStoreConfig, Store};
use harbour_server::tides::{TideFeedClient, TideFeedConfig, TideIngest};
use harbour_server::timetable::{TimetableClient, TimetableConfig};
use harbour_server::weather::{WeatherClient, WeatherConfig, WeatherIngest};
use harbour_server::web::{AppState, create_router};

/// How often to refresh the tide payload (24 hours).
const TIDE_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// How often to refresh the weather payload (3 hours).
const WEATHER_REFRESH_INTERVAL: Duration = Duration::from_secs(3 * 60 * 60);

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env();

    // Pick the store backend
    let store = match &config.store {
        StoreSettings::Rest { url, service_key } => Store::Rest(
            RestStore::new(RestStoreConfig::new(url, service_key))
                .expect("Failed to create REST store"),
        ),
        StoreSettings::Disk { path } => Store::Disk(DiskStore::new(path)),
    };
    info!(backend = store.backend_name(), "Store ready");

    // Timetable client, only when credentials are present; the snapshot
    // service answers 500 without one, ping and health still work.
    let source = config.transport.as_ref().map(|creds| {
        TimetableClient::new(TimetableConfig::new(&creds.app_id, &creds.app_key))
            .expect("Failed to create timetable client")
    });

    let snapshots = SnapshotService::new(source, store.clone(), config.snapshot.clone());

    // Spawn the tide refresh loop. The interval's first tick fires
    // immediately, so the store is seeded at startup.
    let mut tide_config = TideFeedConfig::new();
    if let Some(url) = &config.tide_feed_url {
        tide_config = tide_config.with_feed_url(url);
    }
    let tide_client = TideFeedClient::new(tide_config).expect("Failed to create tide feed client");
    let tide_ingest = TideIngest::new(tide_client, store.clone(), config.snapshot.timezone);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TIDE_REFRESH_INTERVAL);
        loop {
            interval.tick().await;
            match tide_ingest.refresh().await {
                Ok(count) => info!(count, "Refreshed tide payload"),
                Err(e) => warn!(error = %e, "Tide refresh failed"),
            }
        }
    });

    // Spawn the weather refresh loop, when configured
    if let Some(weather) = &config.weather {
        let weather_client =
            WeatherClient::new(WeatherConfig::new(&weather.api_key, weather.lat, weather.lon))
                .expect("Failed to create weather client");
        let weather_ingest = WeatherIngest::new(weather_client, store.clone());
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(WEATHER_REFRESH_INTERVAL);
            loop {
                interval.tick().await;
                match weather_ingest.refresh().await {
                    Ok(count) => info!(count, "Refreshed weather payload"),
                    Err(e) => warn!(error = %e, "Weather refresh failed"),
                }
            }
        });
    }

    // Build app state and router
    let state = AppState::new(snapshots, store, config.http.cache_max_age_secs);
    let app = create_router(state, &config.http.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http.port));
    info!(%addr, "Harbour server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
