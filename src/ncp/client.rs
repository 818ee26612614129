use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::signature::{make_signature, timestamp_ms};
use super::{PowerAction, ServerApi, detail_path, power_path};
use crate::consts::{HEADER_ACCESS_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP};

/// Signed client for the vserver API.
pub struct NcpClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
    secret_key: String,
}

impl NcpClient {
    pub fn new(base_url: &str, access_key: &str, secret_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    /// Use `http` for requests instead of a default client.
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Signed GET. The body is parsed as JSON whatever the HTTP status,
    /// since the gateway puts its error shapes in the body.
    async fn get(&self, path_and_query: &str) -> Result<Value> {
        let timestamp = timestamp_ms();
        let signature = make_signature(
            "GET",
            path_and_query,
            timestamp,
            &self.access_key,
            &self.secret_key,
        );

        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(%url, "vserver request");

        let resp = self
            .http
            .get(&url)
            .header(HEADER_TIMESTAMP, timestamp.to_string())
            .header(HEADER_ACCESS_KEY, &self.access_key)
            .header(HEADER_SIGNATURE, signature)
            .send()
            .await
            .with_context(|| format!("request to {path_and_query} failed"))?;

        let status = resp.status();
        let text = resp.text().await.context("failed to read response body")?;
        debug!(%status, bytes = text.len(), "vserver response");

        serde_json::from_str(&text)
            .with_context(|| format!("response ({status}) is not JSON: {text}"))
    }
}

#[async_trait]
impl ServerApi for NcpClient {
    async fn power(&self, instance: &str, action: PowerAction) -> Result<Value> {
        self.get(&power_path(instance, action)).await
    }

    async fn detail(&self, instance: &str) -> Result<Value> {
        self.get(&detail_path(instance)).await
    }
}
