//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, warn};

use crate::snapshot::SnapshotError;
use crate::store::SnapshotStore;
use crate::tides::TIDES_CACHE_KEY;
use crate::timetable::DepartureSource;
use crate::weather::WEATHER_CACHE_KEY;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// An empty `allowed_origins` slice opens CORS to any origin.
pub fn create_router<S>(state: AppState<S>, allowed_origins: &[String]) -> Router
where
    S: DepartureSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(departures_snapshot::<S>))
        .route("/health", get(health))
        .route("/tides", get(tides_payload::<S>))
        .route("/weather", get(weather_payload::<S>))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Build the CORS layer for the configured origins.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Departure board snapshot.
///
/// A `?ping=1` request short-circuits before the snapshot ladder, so
/// frontend wake-up pings never trigger an upstream fetch.
async fn departures_snapshot<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Response, AppError>
where
    S: DepartureSource + Send + Sync + 'static,
{
    if query.is_ping() {
        let pong = PingResponse {
            ok: true,
            ts: Utc::now().timestamp_millis(),
        };
        return Ok(Json(pong).into_response());
    }

    let snapshot = state.snapshots.snapshot().await?;
    debug!(served = ?snapshot.served, "Serving departures snapshot");

    Ok(cached_json(snapshot.payload, state.cache_max_age_secs))
}

/// Latest tide predictions, read straight from the store.
async fn tides_payload<S: DepartureSource>(State(state): State<AppState<S>>) -> Response {
    payload_or_empty(&state, TIDES_CACHE_KEY, json!({ "events": [] })).await
}

/// Latest weather forecast, read straight from the store.
async fn weather_payload<S: DepartureSource>(State(state): State<AppState<S>>) -> Response {
    payload_or_empty(&state, WEATHER_CACHE_KEY, json!({ "forecast": [] })).await
}

/// Read a stored payload, falling back to an empty shape when the row
/// is missing or the store is unreachable.
async fn payload_or_empty<S: DepartureSource>(
    state: &AppState<S>,
    key: &str,
    empty: serde_json::Value,
) -> Response {
    let payload = match state.store.get(key).await {
        Ok(Some(entry)) => entry.payload,
        Ok(None) => empty,
        Err(e) => {
            warn!(key, error = %e, "Store read failed, serving empty payload");
            empty
        }
    };

    cached_json(payload, state.cache_max_age_secs)
}

/// Serialize a payload to JSON with a Cache-Control hint attached.
fn cached_json(payload: serde_json::Value, max_age_secs: u32) -> Response {
    let mut response = Json(payload).into_response();
    let value = format!("public, max-age={max_age_secs}, s-maxage={max_age_secs}");
    if let Ok(header_value) = HeaderValue::from_str(&value) {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, header_value);
    }
    response
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Config { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<SnapshotError> for AppError {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::MissingCredentials => AppError::Config {
                message: e.to_string(),
            },
            SnapshotError::Upstream(_) => AppError::Upstream {
                message: e.to_string(),
            },
            SnapshotError::Payload(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Config { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        warn!(%status, error = %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::snapshot::{SnapshotConfig, SnapshotService};
    use crate::store::{CacheEntry, MemoryStore, Store};
    use crate::timetable::TimetableError;
    use crate::timetable::mock::{MockDepartureSource, sample_board};

    fn state_with(
        source: Option<MockDepartureSource>,
        store: Store,
    ) -> AppState<MockDepartureSource> {
        let service = SnapshotService::new(source, store.clone(), SnapshotConfig::new());
        AppState::new(service, store, 300)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    fn ping_query() -> Query<SnapshotQuery> {
        Query(SnapshotQuery {
            ping: Some("1".to_string()),
        })
    }

    #[tokio::test]
    async fn ping_short_circuits_the_snapshot_ladder() {
        let source = MockDepartureSource::serving(sample_board());
        let memory = MemoryStore::new();
        let state = state_with(Some(source.clone()), Store::Memory(memory.clone()));

        let response = departures_snapshot(State(state), ping_query())
            .await
            .expect("ping response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
        assert!(body["ts"].is_i64());

        // Neither the upstream nor the store was touched.
        assert_eq!(source.calls(), 0);
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn ping_works_without_credentials() {
        let state = state_with(None, Store::Memory(MemoryStore::new()));

        let response = departures_snapshot(State(state), ping_query())
            .await
            .expect("ping response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn snapshot_response_carries_cache_control() {
        let source = MockDepartureSource::serving(sample_board());
        let state = state_with(Some(source), Store::Memory(MemoryStore::new()));

        let response = departures_snapshot(State(state), Query(SnapshotQuery::default()))
            .await
            .expect("snapshot response");

        assert_eq!(response.status(), StatusCode::OK);
        let cache_control = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        assert_eq!(
            cache_control.as_deref(),
            Some("public, max-age=300, s-maxage=300")
        );

        // Whether refreshed or served as the closed-window placeholder,
        // the payload always carries the station summary.
        let body = body_json(response).await;
        assert_eq!(body["station"]["crs"], json!("PBY"));
    }

    #[tokio::test]
    async fn missing_credentials_is_a_server_error() {
        let state = state_with(None, Store::Memory(MemoryStore::new()));

        let error = departures_snapshot(State(state), Query(SnapshotQuery::default()))
            .await
            .expect_err("no credentials configured");

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("timetable credentials not configured"));
    }

    #[test]
    fn snapshot_errors_map_to_variants() {
        assert!(matches!(
            AppError::from(SnapshotError::MissingCredentials),
            AppError::Config { .. }
        ));
        assert!(matches!(
            AppError::from(SnapshotError::Upstream(TimetableError::RateLimited)),
            AppError::Upstream { .. }
        ));
    }

    #[test]
    fn error_statuses_map_by_variant() {
        let config = AppError::Config {
            message: "m".to_string(),
        };
        assert_eq!(
            config.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let upstream = AppError::Upstream {
            message: "m".to_string(),
        };
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_GATEWAY);

        let internal = AppError::Internal {
            message: "m".to_string(),
        };
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn missing_tides_row_serves_empty_events() {
        let state = state_with(None, Store::Memory(MemoryStore::new()));

        let response = tides_payload(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::CACHE_CONTROL));
        assert_eq!(body_json(response).await, json!({ "events": [] }));
    }

    #[tokio::test]
    async fn missing_weather_row_serves_empty_forecast() {
        let state = state_with(None, Store::Memory(MemoryStore::new()));

        let response = weather_payload(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "forecast": [] }));
    }

    #[tokio::test]
    async fn stored_tides_row_is_served_verbatim() {
        let memory = MemoryStore::new();
        let payload = json!({
            "events": [
                { "tide_time": "2026-03-10T08:12:00+00:00", "tide_type": "High", "height_m": 7.4 }
            ]
        });
        memory
            .upsert(&CacheEntry {
                key: TIDES_CACHE_KEY.to_string(),
                payload: payload.clone(),
                updated_at: Utc::now(),
            })
            .await
            .expect("seed store");
        let state = state_with(None, Store::Memory(memory));

        let response = tides_payload(State(state)).await;

        assert_eq!(body_json(response).await, payload);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        assert_eq!(health().await, "ok");
    }

    #[test]
    fn router_builds_with_open_cors() {
        let state = state_with(None, Store::Memory(MemoryStore::new()));
        let _router = create_router(state, &[]);
    }

    #[test]
    fn router_builds_with_specific_origins() {
        let state = state_with(None, Store::Memory(MemoryStore::new()));
        let origins = vec!["https://harbour.example".to_string()];
        let _router = create_router(state, &origins);
    }
}
