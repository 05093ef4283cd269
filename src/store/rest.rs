//! PostgREST client, the data API behind Supabase projects.

use super::{decode_rows, Columns, Query, Record, RowStore};
use crate::error::{ConfigError, StoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;

const REST_PREFIX: &str = "rest/v1";

pub struct RestStore {
    client: reqwest::Client,
    endpoint: String,
}

impl RestStore {
    /// Build a client for `endpoint` (project URL, e.g. `https://xyz.supabase.co`) authenticated with `key`.
    pub fn new(endpoint: &str, key: &str) -> Result<Self, ConfigError> {
        let parsed = reqwest::Url::parse(endpoint).map_err(|e| ConfigError::InvalidVar {
            var: "PUBLIC_SUPABASE_URL",
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidVar {
                var: "PUBLIC_SUPABASE_URL",
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let invalid_key = |_| ConfigError::InvalidVar {
            var: "PUBLIC_ANON_KEY",
            reason: "not a valid header value".into(),
        };
        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(key).map_err(invalid_key)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid_key)?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::InvalidVar {
                var: "PUBLIC_SUPABASE_URL",
                reason: format!("http client: {}", e),
            })?;

        Ok(RestStore {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}/{}", self.endpoint, REST_PREFIX, resource)
    }

    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String, StoreError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(format!("reading body from {}: {}", url, e)))?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }
}

/// Query-string parameters in PostgREST syntax: `select=a,b`, `field=eq.value`, `limit=n`.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let select = match &query.columns {
        Columns::All => "*".to_string(),
        Columns::Only(cols) => cols.join(","),
        Columns::Text(cols) => cols
            .iter()
            .map(|c| format!("{}::text", c))
            .collect::<Vec<_>>()
            .join(","),
    };
    let mut params = vec![("select".to_string(), select)];
    if let Some(filter) = &query.filter {
        params.push((filter.field.clone(), format!("eq.{}", filter.value)));
    }
    if let Some(n) = query.limit {
        params.push(("limit".to_string(), n.to_string()));
    }
    params
}

/// PostgREST error bodies are `{"code", "message", "details", "hint"}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl RowStore for RestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        let url = self.resource_url(&query.resource);
        let params = query_params(query);
        tracing::debug!(url = %url, params = ?params, "rest select");
        let body = self.get(&url, &params).await?;
        decode_rows(&body)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let url = format!("{}/{}/", self.endpoint, REST_PREFIX);
        self.get(&url, &[]).await.map(|_| ())
    }

    fn describe(&self) -> &'static str {
        "rest"
    }
}
