// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory bridge double for tests.

use super::{Bridge, BridgeError, BridgeResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use relay_core::Task;
use std::collections::VecDeque;
use std::sync::Arc;

/// Returns pre-programmed results in call order; records every task it was
/// asked to execute.
pub struct FakeBridge {
    queued_results: Mutex<VecDeque<Result<BridgeResult, BridgeError>>>,
    calls: Mutex<Vec<Task>>,
    healthy: Arc<Mutex<bool>>,
}

impl FakeBridge {
    pub fn new() -> Self {
        FakeBridge {
            queued_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            healthy: Arc::new(Mutex::new(true)),
        }
    }

    pub fn push_result(&self, result: Result<BridgeResult, BridgeError>) {
        self.queued_results.lock().push_back(result);
    }

    pub fn calls(&self) -> Vec<Task> {
        self.calls.lock().clone()
    }

    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock() = healthy;
    }
}

impl Default for FakeBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bridge for FakeBridge {
    async fn execute(&self, task: &Task) -> Result<BridgeResult, BridgeError> {
        self.calls.lock().push(task.clone());
        self.queued_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(BridgeResult::sync_ok("fake response")))
    }

    async fn health(&self) -> bool {
        *self.healthy.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::Priority;

    #[tokio::test]
    async fn records_calls_and_plays_queued_results() {
        let bridge = FakeBridge::new();
        bridge.push_result(Ok(BridgeResult::sync_ok("hello")));
        let task = Task::new("a", "b", Priority::Low);
        let result = bridge.execute(&task).await.unwrap();
        assert_eq!(result.response.as_deref(), Some("hello"));
        assert_eq!(bridge.calls().len(), 1);
    }
}
