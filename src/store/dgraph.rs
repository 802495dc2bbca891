//! Dgraph HTTP client
//!
//! Queries are posted as DQL to `{url}/query`. Every request is read-only;
//! best-effort reads are opted into per store. Dgraph answers with an
//! envelope `{"data": {...}, "errors": [...]}` and only `data` is handed on.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::GraphStore;
use crate::error::StoreError;

const DQL_CONTENT_TYPE: &str = "application/dql";

/// Dgraph store reached over its HTTP API
pub struct DgraphStore {
    client: reqwest::Client,
    query_url: Url,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    message: String,
}

impl DgraphStore {
    /// Create a store for the Dgraph alpha at `base_url`
    pub fn new(base_url: &str, timeout: Duration, best_effort: bool) -> Result<Self> {
        let query_url = query_url(base_url, best_effort)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::debug!("Created Dgraph store for: {}", query_url);

        Ok(Self { client, query_url })
    }
}

fn query_url(base_url: &str, best_effort: bool) -> Result<Url> {
    let mut base =
        Url::parse(base_url).with_context(|| format!("Invalid Dgraph URL: {}", base_url))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base
        .join("query")
        .with_context(|| format!("Invalid Dgraph URL: {}", base_url))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("ro", "true");
        if best_effort {
            pairs.append_pair("be", "true");
        }
    }
    Ok(url)
}

fn unwrap_envelope(body: &[u8]) -> Result<Vec<u8>, StoreError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| StoreError::Malformed(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let messages = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(StoreError::Query(messages));
    }

    let data = envelope
        .data
        .ok_or_else(|| StoreError::Malformed("reply has no data".to_string()))?;
    serde_json::to_vec(&data).map_err(|e| StoreError::Malformed(e.to_string()))
}

#[async_trait]
impl GraphStore for DgraphStore {
    async fn execute_raw(&self, query: &str) -> Result<Vec<u8>, StoreError> {
        tracing::debug!("Posting query to: {}", self.query_url);
        tracing::trace!("Query text:\n{}", query);

        let resp = self
            .client
            .post(self.query_url.clone())
            .header(reqwest::header::CONTENT_TYPE, DQL_CONTENT_TYPE)
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        unwrap_envelope(&body)
    }
}
