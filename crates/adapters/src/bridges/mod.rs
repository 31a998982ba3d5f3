// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Bridge` trait and its four concrete transports.

mod claude;
mod codex;
mod gemini;
mod ollama;

pub use claude::ClaudeBridge;
pub use codex::CodexBridge;
pub use gemini::GeminiBridge;
pub use ollama::OllamaBridge;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBridge;

use async_trait::async_trait;
use relay_core::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge unavailable: {0}")]
    Unavailable(String),
    #[error("bridge timed out: {0}")]
    Timeout(String),
    #[error("bridge protocol error: {0}")]
    Protocol(String),
}

/// How a `BridgeResult` arrived: immediately in-band, or asynchronously via
/// a file dropped in the inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMode {
    Sync,
    AsyncFile,
}

/// The outcome of a bridge call, tagged by `mode` for the sync-vs-async
/// distinction (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResult {
    pub success: bool,
    pub mode: ResultMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
}

impl BridgeResult {
    pub fn sync_ok(response: impl Into<String>) -> Self {
        BridgeResult {
            success: true,
            mode: ResultMode::Sync,
            response: Some(response.into()),
            error: None,
            file: None,
            message: None,
            metrics: None,
        }
    }

    pub fn sync_ok_with_metrics(response: impl Into<String>, metrics: Value) -> Self {
        let mut r = Self::sync_ok(response);
        r.metrics = Some(metrics);
        r
    }

    pub fn sync_err(error: impl Into<String>) -> Self {
        BridgeResult {
            success: false,
            mode: ResultMode::Sync,
            response: None,
            error: Some(error.into()),
            file: None,
            message: None,
            metrics: None,
        }
    }

    pub fn async_scheduled(file: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeResult {
            success: true,
            mode: ResultMode::AsyncFile,
            response: None,
            error: None,
            file: Some(file.into()),
            message: Some(message.into()),
            metrics: None,
        }
    }

    pub fn async_err(error: impl Into<String>) -> Self {
        BridgeResult {
            success: false,
            mode: ResultMode::AsyncFile,
            response: None,
            error: Some(error.into()),
            file: None,
            message: None,
            metrics: None,
        }
    }
}

/// A transport that delivers a dispatched task to a worker and harvests its
/// result. `execute` starts delivery (blocking to a final result for
/// synchronous bridges, returning immediately once scheduled for file-drop
/// bridges); `check_result` polls for an asynchronously-arriving result and
/// always returns `None` for synchronous bridges.
#[async_trait]
pub trait Bridge: Send + Sync {
    async fn execute(&self, task: &Task) -> Result<BridgeResult, BridgeError>;

    async fn check_result(&self, task: &Task) -> Result<Option<BridgeResult>, BridgeError> {
        let _ = task;
        Ok(None)
    }

    /// Liveness probe; `true` if the underlying worker/service can currently
    /// be reached.
    async fn health(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_ok_has_sync_mode_and_no_file() {
        let r = BridgeResult::sync_ok("hello");
        assert!(r.success);
        assert_eq!(r.mode, ResultMode::Sync);
        assert!(r.file.is_none());
    }

    #[test]
    fn async_scheduled_has_async_mode() {
        let r = BridgeResult::async_scheduled("TASK_x.md", "scheduled");
        assert!(r.success);
        assert_eq!(r.mode, ResultMode::AsyncFile);
    }
}
