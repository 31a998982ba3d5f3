// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-drop bridge: hands a task to an agent via the inbox directory.

use super::{Bridge, BridgeError, BridgeResult};
use async_trait::async_trait;
use relay_core::Task;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Writes `TASK_{id}_FOR_{AGENT}.md` into the inbox and returns immediately.
/// Reads `RESULT_{id}_FROM_{AGENT}.md` back out when polled. Shared by the
/// claude and gemini bridges — they differ only in the target agent name.
pub struct FileDropBridge {
    inbox_dir: PathBuf,
    agent_name: String,
}

impl FileDropBridge {
    pub fn new(inbox_dir: impl Into<PathBuf>, agent_name: impl Into<String>) -> Self {
        FileDropBridge {
            inbox_dir: inbox_dir.into(),
            agent_name: agent_name.into(),
        }
    }

    pub fn task_drop_path(inbox_dir: &Path, task_id: &str, agent_name: &str) -> PathBuf {
        inbox_dir.join(format!("TASK_{task_id}_FOR_{agent_name}.md"))
    }

    pub fn result_path(inbox_dir: &Path, task_id: &str, agent_name: &str) -> PathBuf {
        inbox_dir.join(format!("RESULT_{task_id}_FROM_{agent_name}.md"))
    }

    fn render_task_markdown(task: &Task, agent_name: &str) -> String {
        let result_name = format!("RESULT_{}_FROM_{}.md", task.id, agent_name);
        format!(
            "# TASK {id}\n\
             ## DLA: {agent}\n\
             ## OD: orchestrator\n\
             ## PRIORYTET: {priority}\n\
             ## OPIS: {title}\n\
             ## KONTEKST: {description}\n\
             ## KRYTERIA AKCEPTACJI: drop {result_name} in the inbox when done\n",
            id = task.id,
            agent = agent_name,
            priority = task.priority,
            title = task.title,
            description = task.description,
            result_name = result_name,
        )
    }
}

#[async_trait]
impl Bridge for FileDropBridge {
    async fn execute(&self, task: &Task) -> Result<BridgeResult, BridgeError> {
        fs::create_dir_all(&self.inbox_dir)
            .await
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        let path = Self::task_drop_path(&self.inbox_dir, task.id.as_str(), &self.agent_name);
        let body = Self::render_task_markdown(task, &self.agent_name);
        fs::write(&path, body)
            .await
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        Ok(BridgeResult::async_scheduled(
            path.display().to_string(),
            format!("task dropped for {}", self.agent_name),
        ))
    }

    async fn check_result(&self, task: &Task) -> Result<Option<BridgeResult>, BridgeError> {
        let path = Self::result_path(&self.inbox_dir, task.id.as_str(), &self.agent_name);
        match fs::read(&path).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                Ok(Some(BridgeResult::sync_ok(text)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::Unavailable(e.to_string())),
        }
    }

    async fn health(&self) -> bool {
        self.inbox_dir.exists() || fs::create_dir_all(&self.inbox_dir).await.is_ok()
    }
}

/// The file-drop bridge for the `CLAUDE_LUSTRO` agent.
pub struct ClaudeBridge {
    inner: FileDropBridge,
}

impl ClaudeBridge {
    pub fn new(inbox_dir: impl Into<PathBuf>) -> Self {
        ClaudeBridge {
            inner: FileDropBridge::new(inbox_dir, "CLAUDE_LUSTRO"),
        }
    }
}

#[async_trait]
impl Bridge for ClaudeBridge {
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
