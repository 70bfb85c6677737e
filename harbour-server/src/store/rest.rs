//! REST store backend (PostgREST, as hosted by Supabase).
//!
//! Rows live in a single table with a unique `key` column. Writes go
//! through PostgREST's upsert path (`on_conflict` plus merge-duplicates)
//! so a refresh never races an insert against an existing row.

use reqwest::header::{HeaderMap, HeaderValue};

use super::error::StoreError;
use super::kv::{CacheEntry, SnapshotStore};

/// Default table holding the snapshot rows.
const DEFAULT_TABLE: &str = "api_cache";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the REST store.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Service-role key, sent as both `apikey` and bearer token
    pub service_key: String,
    /// Table holding the rows
    pub table: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RestStoreConfig {
    /// Create a new config with the given project URL and service key.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// PostgREST-backed snapshot store.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    /// Full table endpoint, `{base}/rest/v1/{table}`.
    endpoint: String,
}

impl RestStore {
    /// Create a new REST store with the given configuration.
    pub fn new(config: RestStoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key =
            HeaderValue::from_str(&config.service_key).map_err(|_| StoreError::Api {
                status: 0,
                message: "Invalid service key format".to_string(),
            })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key)).map_err(
            |_| StoreError::Api {
                status: 0,
                message: "Invalid service key format".to_string(),
            },
        )?;
        headers.insert("apikey", api_key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let endpoint = format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        );

        Ok(Self { http, endpoint })
    }
}

impl SnapshotStore for RestStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", format!("eq.{}", key)),
                ("select", "key,payload,updated_at".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let body = response.text().await?;

        let rows: Vec<CacheEntry> = serde_json::from_str(&body).map_err(|e| StoreError::Serde {
            message: format!("{} (body: {})", e, snippet(&body)),
        })?;

        Ok(rows.into_iter().next())
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("on_conflict", "key")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(std::slice::from_ref(entry))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        Ok(())
    }
}

/// First part of a response body, kept for error messages.
fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
