// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the `relayd` REST surface (§6). One thin wrapper around
//! `reqwest`; every command module goes through this rather than building
//! requests by hand.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// How long a single request waits before giving up.
pub fn timeout() -> Duration {
    parse_duration_ms("RELAY_CLI_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
}

/// Base URL for the daemon's API: `RELAY_API_URL` > `http://127.0.0.1:7878/api/v1`.
pub fn base_url() -> String {
    std::env::var("RELAY_API_URL").unwrap_or_else(|_| "http://127.0.0.1:7878/api/v1".to_string())
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach relayd at {url}: {source}")]
    Unreachable { url: String, source: reqwest::Error },

    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("malformed response from relayd: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Exit code per §6: 1 for an unreachable daemon, 2 for an HTTP 4xx/5xx.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Unreachable { .. } => 1,
            ClientError::Api { .. } | ClientError::Decode(_) => 2,
        }
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder().timeout(timeout()).build().unwrap_or_default();
        Self { http, base_url: base_url() }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.get(&url).send().await.map_err(|source| ClientError::Unreachable { url: url.clone(), source })?;
        Self::into_value(resp).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Unreachable { url: url.clone(), source })?;
        Self::into_value(resp).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Value, ClientError> {
        self.post(path, &serde_json::json!({})).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Unreachable { url: url.clone(), source })?;
        Self::into_value(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.delete(&url).send().await.map_err(|source| ClientError::Unreachable { url: url.clone(), source })?;
        Self::into_value(resp).await
    }

    async fn into_value(resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(ClientError::Api { status: status.as_u16(), detail });
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
