// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem watcher: inbox file drops and agent state-log modifications
//! are turned into `InboxFsEvent`s on a channel. The watcher thread never
//! touches `TaskManager` or `AgentRegistry` directly — it only enqueues;
//! a single consumer on the main scheduler performs mutations (§4.5, §9).

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// One filesystem observation, ready for the main scheduler to interpret.
#[derive(Debug, Clone)]
pub enum InboxFsEvent {
    /// A new `.md` file appeared in the inbox directory.
    InboxFileCreated(PathBuf),
    /// Some file under the agents directory was modified (state-log tail).
    AgentsDirModified(PathBuf),
}

/// Holds the two `notify` watchers alive for the process lifetime; dropping
/// this stops watching.
pub struct InboxWatcherHandle {
    _inbox_watcher: RecommendedWatcher,
    _agents_watcher: RecommendedWatcher,
}

/// Starts watching the inbox directory (non-recursive: drops land flat) and
/// the agents directory (recursive: state logs live one level down inside
/// each agent's subdirectory), forwarding events to `tx`.
pub fn start(
    inbox_dir: &Path,
    agents_dir: &Path,
    tx: mpsc::Sender<InboxFsEvent>,
) -> Result<InboxWatcherHandle, notify::Error> {
    std::fs::create_dir_all(inbox_dir).ok();
    std::fs::create_dir_all(agents_dir).ok();

    let inbox_tx = tx.clone();
    let mut inbox_watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_create() {
                for path in event.paths {
                    if path.extension().and_then(|e| e.to_str()) == Some("md") {
                        let _ = inbox_tx.blocking_send(InboxFsEvent::InboxFileCreated(path));
                    }
                }
            }
        }
    })?;
    inbox_watcher.watch(inbox_dir, RecursiveMode::NonRecursive)?;

    let agents_tx = tx;
    let mut agents_watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() {
                for path in event.paths {
                    if path.file_name().and_then(|n| n.to_str()) == Some(super::registry::STATE_LOG_FILENAME) {
                        let _ = agents_tx.blocking_send(InboxFsEvent::AgentsDirModified(path));
                    }
                }
            }
        }
    })?;
    agents_watcher.watch(agents_dir, RecursiveMode::Recursive)?;

    Ok(InboxWatcherHandle {
        _inbox_watcher: inbox_watcher,
        _agents_watcher: agents_watcher,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::time::timeout;

    #[tokio::test]
    async fn inbox_file_creation_is_observed() {
        let inbox = tempdir().unwrap();
        let agents = tempdir().unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        let _handle = start(inbox.path(), agents.path(), tx).unwrap();

        let file_path = inbox.path().join("TASK_abc123_FOR_CLAUDE.md");
        tokio::fs::write(&file_path, "body").await.unwrap();

        let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        match event {
            InboxFsEvent::InboxFileCreated(p) => assert_eq!(p, file_path),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
