//! Supabase Storage over its REST API.
//!
//! Only the two endpoints the hygiene helpers need are wrapped:
//! `POST /storage/v1/object/list/{bucket}` and
//! `DELETE /storage/v1/object/{bucket}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::record::{FileRecord, ListOptions};
use super::StorageBackend;
use crate::common::config::Config;
use crate::common::errors::StorageError;

/// Page size Supabase itself defaults to
const DEFAULT_LIMIT: u32 = 100;

pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    api_key: String,
    default_limit: u32,
}

/// Body of the bulk delete request
#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

/// Error body returned by the storage API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            default_limit: DEFAULT_LIMIT,
        })
    }

    /// Project URL from config (or `SUPABASE_URL`), key from the env var named by `api_key_env`
    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let url = config.supabase_url.as_deref().ok_or_else(|| {
            StorageError::Config(
                "no Supabase URL configured (set SUPABASE_URL or `config set supabase_url`)"
                    .to_string(),
            )
        })?;
        let key = config.api_key().ok_or_else(|| {
            StorageError::Config(format!(
                "API key not found in environment variable {}",
                config.api_key_env
            ))
        })?;
        let mut backend = Self::new(url, key, Duration::from_secs(config.request_timeout_secs))?;
        backend.default_limit = config.list_limit;
        Ok(backend)
    }

    fn list_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/object/list/{}", self.base_url, bucket)
    }

    fn remove_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/object/{}", self.base_url, bucket)
    }
}

/// Request body for a list call: Supabase defaults, then the caller's
/// options on top, then the prefix.
pub fn list_body(path: &str, options: &ListOptions, default_limit: u32) -> Result<Value, StorageError> {
    // Shape-check the numeric keys so a bad value fails here, not as an opaque 400
    options.count("limit")?;
    options.count("offset")?;
    options.text("search")?;

    let mut body = json!({
        "limit": default_limit,
        "offset": 0,
        "sortBy": { "column": "name", "order": "asc" },
    });
    if let Value::Object(map) = &mut body {
        for (key, value) in options.as_map() {
            map.insert(key.clone(), value.clone());
        }
        map.insert("prefix".to_string(), Value::String(path.to_string()));
    }
    Ok(body)
}

/// Pull a readable message out of an error response body
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| fallback.to_string())
}

async fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("request failed")),
    })
}

#[async_trait]
impl StorageBackend for SupabaseBackend {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn list(
        &self,
        bucket: &str,
        path: &str,
        options: &ListOptions,
    ) -> Result<Option<Vec<FileRecord>>, StorageError> {
        let body = list_body(path, options, self.default_limit)?;
        debug!(bucket, path, "POST {}", self.list_url(bucket));

        let response = self
            .client
            .post(self.list_url(bucket))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let text = response.text().await?;
        let records: Option<Vec<FileRecord>> = serde_json::from_str(&text)?;
        Ok(records)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        debug!(bucket, count = paths.len(), "DELETE {}", self.remove_url(bucket));

        let response = self
            .client
            .delete(self.remove_url(bucket))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
