// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single consumer of [`relay_adapters::InboxFsEvent`]. Runs on the main
//! scheduler (a spawned tokio task, not the watcher's own FS thread) so that
//! every `TaskManager`/`AgentRegistry`/`LiveFeed` mutation it makes goes
//! through the same serialized path as the HTTP handlers (§4.5, §9).

use crate::audit::AuditEntry;
use crate::core::Core;
use relay_core::{AgentStatus, LiveEventType, TaskStatus};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tracing::{info, warn};

use regex::Regex;

fn result_from_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^RESULT_([0-9a-f]+)_FROM_([A-Za-z0-9_]+)\.md$").unwrap())
}

fn codex_result_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^CODEX_RESULT_\d{8}_\d{6}\.md$").unwrap())
}

/// Drains `rx` until the sender side is dropped, applying §4.5's exact
/// per-event logic against `core`.
pub async fn run(core: &Core, mut rx: mpsc::Receiver<relay_adapters::InboxFsEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            relay_adapters::InboxFsEvent::InboxFileCreated(path) => handle_inbox_file(core, &path).await,
            relay_adapters::InboxFsEvent::AgentsDirModified(_) => {
                if let Err(e) = core.registry.scan() {
                    warn!(error = %e, "agents directory rescan failed");
                }
            }
        }
    }
}

async fn handle_inbox_file(core: &Core, path: &Path) {
    let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    if !filename.ends_with(".md") {
        return;
    }

    if let Some(caps) = result_from_pattern().captures(filename) {
        let task_id = &caps[1];
        let agent = &caps[2];
        if let Some(task) = core.tasks.get(task_id) {
            if task.status == TaskStatus::Running {
                complete_from_file(core, task_id, agent, path).await;
                return;
            }
        }
        audit_only(core, "inbox_file", agent, task_id, filename);
        return;
    }

    if codex_result_pattern().is_match(filename) {
        if let Some(task) = first_running_codex_task(core) {
            let task_id = task.id.as_str().to_string();
            let agent = task.assigned_to.clone().unwrap_or_default();
            complete_from_file(core, &task_id, &agent, path).await;
        } else {
            audit_only(core, "inbox_file", "CODEX", "", filename);
        }
        return;
    }

    audit_only(core, "inbox_file", "", "", filename);
}

fn first_running_codex_task(core: &Core) -> Option<relay_core::Task> {
    core.tasks
        .list(Some(TaskStatus::Running), None, None)
        .into_iter()
        .find(|t| {
            t.assigned_to
                .as_deref()
                .and_then(|name| core.registry.get(name))
                .map(|a| a.bridge_type == relay_core::BridgeKind::Codex)
                .unwrap_or(false)
        })
}

async fn complete_from_file(core: &Core, task_id: &str, agent: &str, result_path: &Path) {
    let content = fs::read_to_string(result_path).unwrap_or_else(|_| {
        String::from_utf8_lossy(&fs::read(result_path).unwrap_or_default()).into_owned()
    });

    match core.tasks.complete(task_id, content) {
        Ok(_) => {
            core.registry.update_status(agent, AgentStatus::Idle, None);
            core.audit.record(AuditEntry {
                action: "inbox_complete",
                agent,
                task_id,
                status: "done",
                details: "result file observed",
            });
            core.live_feed.broadcast(
                LiveEventType::TaskComplete,
                json!({"task_id": task_id, "agent": agent, "status": "done"}),
            );
            archive(result_path, task_id, agent);
            info!(task_id, agent, "task completed via inbox watcher");
        }
        Err(e) => {
            warn!(task_id, agent, error = %e, "failed to complete task from inbox result");
        }
    }
}

fn audit_only(core: &Core, action: &str, agent: &str, task_id: &str, details: &str) {
    core.audit.record(AuditEntry {
        action,
        agent,
        task_id,
        status: "n/a",
        details,
    });
}

/// Moves the TASK and RESULT files for `task_id`/`agent` into `DONE/` under
/// the inbox directory, creating it if absent. Best-effort: failures are
/// logged, never propagated (archiving is not a correctness requirement).
fn archive(result_path: &Path, task_id: &str, agent: &str) {
    let Some(inbox_dir) = result_path.parent() else {
        return;
    };
    let done_dir = inbox_dir.join("DONE");
    if fs::create_dir_all(&done_dir).is_err() {
        return;
    }
    if let Some(name) = result_path.file_name() {
        let _ = fs::rename(result_path, done_dir.join(name));
    }
    let task_file = inbox_dir.join(format!("TASK_{task_id}_FOR_{agent}.md"));
    if task_file.exists() {
        let _ = fs::rename(&task_file, done_dir.join(format!("TASK_{task_id}_FOR_{agent}.md")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_pattern_matches_expected_filename() {
        let caps = result_from_pattern().captures("RESULT_abc123def456_FROM_CLAUDE_LUSTRO.md").unwrap();
        assert_eq!(&caps[1], "abc123def456");
        assert_eq!(&caps[2], "CLAUDE_LUSTRO");
    }

    #[test]
    fn codex_pattern_matches_timestamped_filename() {
        assert!(codex_result_pattern().is_match("CODEX_RESULT_20260727_120000.md"));
        assert!(!codex_result_pattern().is_match("CODEX_RESULT_bogus.md"));
    }
}
