use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::StoreError;
use crate::store::TagStore;
use crate::types::{MatchResult, Tag, TagDecision};

// Shared client with connection pooling; per-request timeouts come from the
// store config so one slow backend does not redefine them for everyone.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(16)
        .build()
        .expect("failed to build HTTP client")
});

/// Connection settings for [`HttpTagStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpStoreConfig {
    /// Base URL of the tag store. A trailing slash is tolerated.
    pub base_url: String,
    /// Value sent verbatim as the `Authorization` header when present.
    #[serde(default)]
    pub auth_header: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "HttpStoreConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpStoreConfig {
    pub(crate) fn default_timeout_secs() -> u64 {
        30
    }
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            auth_header: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// [`TagStore`] speaking JSON over HTTP.
///
/// Routes: `POST {base}/rpc/match_tags`, `GET {base}/categories/{name}/tags`,
/// and `POST {base}/decisions`. An HTTP 404 or 501 maps to
/// [`StoreError::Unavailable`], which the health probe reports as a missing
/// backing function rather than a failing one.
pub struct HttpTagStore {
    cfg: HttpStoreConfig,
}

impl HttpTagStore {
    pub fn new(cfg: HttpStoreConfig) -> Self {
        Self { cfg }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<Value, StoreError> {
        let mut request = request.timeout(Duration::from_secs(self.cfg.timeout_secs));
        if let Some(header) = self.cfg.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND
            || status == reqwest::StatusCode::NOT_IMPLEMENTED
        {
            return Err(StoreError::Unavailable(format!("{path} returned {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!("HTTP {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Decode(format!("invalid JSON from {path}: {e}")))
    }
}

#[async_trait]
impl TagStore for HttpTagStore {
    async fn match_tags(
        &self,
        text: &str,
        category: &str,
        min_confidence: f32,
    ) -> Result<Vec<MatchResult>, StoreError> {
        let path = "rpc/match_tags";
        let payload = json!({
            "text": text,
            "category": category,
            "min_confidence": min_confidence,
        });
        let response = self
            .send(HTTP_CLIENT.post(self.url(path)).json(&payload), path)
            .await?;
        parse_match_results(response)
    }

    async fn list_tags(&self, category: &str) -> Result<Vec<Tag>, StoreError> {
        let path = format!("categories/{category}/tags");
        let response = self.send(HTTP_CLIENT.get(self.url(&path)), &path).await?;
        parse_tags(response)
    }

    async fn append_decision(&self, decision: &TagDecision) -> Result<String, StoreError> {
        let path = "decisions";
        let response = self
            .send(HTTP_CLIENT.post(self.url(path)).json(decision), path)
            .await?;
        parse_decision_id(response)
    }
}

// Backends differ on whether collections arrive bare or under a wrapper
// key, so both shapes are accepted.

fn parse_match_results(value: Value) -> Result<Vec<MatchResult>, StoreError> {
    let collection = unwrap_collection(value, "matches");
    serde_json::from_value(collection)
        .map_err(|e| StoreError::Decode(format!("unexpected match result shape: {e}")))
}

fn parse_tags(value: Value) -> Result<Vec<Tag>, StoreError> {
    let collection = unwrap_collection(value, "tags");
    serde_json::from_value(collection)
        .map_err(|e| StoreError::Decode(format!("unexpected tag listing shape: {e}")))
}

fn parse_decision_id(value: Value) -> Result<String, StoreError> {
    match value {
        Value::String(id) => Ok(id),
        Value::Object(mut map) => match map.remove("id") {
            Some(Value::String(id)) => Ok(id),
            other => Err(StoreError::Decode(format!(
                "decision response missing string `id`, got {other:?}"
            ))),
        },
        other => Err(StoreError::Decode(format!(
            "unexpected decision response shape: {other:?}"
        ))),
    }
}

fn unwrap_collection(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Array(Vec::new())),
        other => other,
    }
}
