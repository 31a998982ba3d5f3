// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous HTTP bridge to a local Ollama-compatible inference endpoint.

use super::{Bridge, BridgeError, BridgeResult};
use async_trait::async_trait;
use relay_core::Task;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::warn;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_ctx: u32,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    num_predict: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            num_ctx: 8192,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.9,
            num_predict: 2048,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    eval_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// Targets a local inference endpoint, default `http://localhost:11434`.
pub struct OllamaBridge {
    client: reqwest::Client,
    base_url: String,
    default_model: String,
    generate_timeout: Duration,
}

impl OllamaBridge {
    pub fn new(base_url: impl Into<String>, default_model: impl Into<String>, generate_timeout: Duration) -> Self {
        OllamaBridge {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            default_model: default_model.into(),
            generate_timeout,
        }
    }

    pub fn with_default_timeout(base_url: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self::new(base_url, default_model, Duration::from_secs(120))
    }

    pub async fn list_models(&self) -> Result<Vec<String>, BridgeError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(BridgeError::Protocol(format!("status {}", resp.status())));
        }
        let body: TagsResponse = resp
            .json()
            .await
            .map_err(|e| BridgeError::Protocol(e.to_string()))?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }

    pub async fn execute_with(
        &self,
        task: &Task,
        model: Option<&str>,
        temperature: Option<f32>,
        system_prompt: Option<&str>,
    ) -> Result<BridgeResult, BridgeError> {
        let prompt = format!("# Task: {}\n\n{}", task.title, task.description);
        let mut options = GenerateOptions::default();
        if let Some(t) = temperature {
            options.temperature = t;
        }
        let request = GenerateRequest {
            model: model.unwrap_or(&self.default_model).to_string(),
            prompt,
            stream: false,
            options,
            system: system_prompt.map(|s| s.to_string()),
        };

        let url = format!("{}/api/generate", self.base_url);
        let resp = match self
            .client
            .post(&url)
            .timeout(self.generate_timeout)
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Err(BridgeError::Timeout(e.to_string())),
            Err(e) => return Ok(BridgeResult::sync_err(e.to_string())),
        };

        if !resp.status().is_success() {
            return Ok(BridgeResult::sync_err(format!("http status {}", resp.status())));
        }

        let body: GenerateResponse = match resp.json().await {
            Ok(b) => b,
            Err(e) => return Ok(BridgeResult::sync_err(e.to_string())),
        };

        let metrics = json!({
            "eval_count": body.eval_count,
            "eval_duration": body.eval_duration,
        });
        Ok(BridgeResult::sync_ok_with_metrics(body.response, metrics))
    }
}

#[async_trait]
impl Bridge for OllamaBridge {
    async fn execute(&self, task: &Task) -> Result<BridgeResult, BridgeError> {
        self.execute_with(task, None, None, None).await
    }

    async fn health(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!(error = %e, "ollama health probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generate_options_match_spec_constants() {
        let o = GenerateOptions::default();
        assert_eq!(o.num_ctx, 8192);
        assert_eq!(o.top_k, 40);
        assert_eq!(o.top_p, 0.9);
        assert_eq!(o.num_predict, 2048);
    }

    #[test]
    fn prompt_template_matches_spec() {
        let task = Task::new("write a fibonacci function", "in python", relay_core::Priority::Medium);
        let prompt = format!("# Task: {}\n\n{}", task.title, task.description);
        assert_eq!(prompt, "# Task: write a fibonacci function\n\nin python");
    }
}
