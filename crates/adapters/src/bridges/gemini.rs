// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-drop bridge for the `GEMINI_ARCHITECT` agent.

use super::claude::FileDropBridge;
use super::{Bridge, BridgeError, BridgeResult};
use async_trait::async_trait;
use relay_core::Task;
use std::path::PathBuf;

pub struct GeminiBridge {
    inner: FileDropBridge,
}

impl GeminiBridge {
    pub fn new(inbox_dir: impl Into<PathBuf>) -> Self {
        GeminiBridge {
            inner: FileDropBridge::new(inbox_dir, "GEMINI_ARCHITECT"),
        }
    }
}

#[async_trait]
impl Bridge for GeminiBridge {
    async fn execute(&self, task: &Task) -> Result<BridgeResult, BridgeError> {
        self.inner.execute(task).await
    }

    async fn check_result(&self, task: &Task) -> Result<Option<BridgeResult>, BridgeError> {
        self.inner.check_result(task).await
    }

    async fn health(&self) -> bool {
        self.inner.health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::Priority;
    use tempfile::tempdir;

    #[tokio::test]
    async fn execute_drops_file_named_for_gemini() {
        let dir = tempdir().unwrap();
        let bridge = GeminiBridge::new(dir.path());
        let task = Task::new("design the new routing layer", "...", Priority::High);
        let result = bridge.execute(&task).await.unwrap();
        assert!(result.success);
        let path = FileDropBridge::task_drop_path(dir.path(), task.id.as_str(), "GEMINI_ARCHITECT");
        assert!(path.exists());
    }
}
