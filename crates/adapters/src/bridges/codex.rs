// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess bridge: shells out to an external helper script which drops
//! its result into the inbox asynchronously.

use super::{Bridge, BridgeError, BridgeResult};
use async_trait::async_trait;
use relay_core::Task;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

const CODEX_TIMEOUT: Duration = Duration::from_secs(300);

/// Invokes `helper_script (prompt, repo_root)`. The helper ultimately drops
/// a `CODEX_RESULT_<timestamp>.md` file into the inbox; this bridge itself
/// only reports whether the invocation was accepted.
pub struct CodexBridge {
    helper_script: PathBuf,
    repo_root: PathBuf,
}

impl CodexBridge {
    pub fn new(helper_script: impl Into<PathBuf>, repo_root: impl Into<PathBuf>) -> Self {
        CodexBridge {
            helper_script: helper_script.into(),
            repo_root: repo_root.into(),
        }
    }
}

#[async_trait]
impl Bridge for CodexBridge {
    async fn execute(&self, task: &Task) -> Result<BridgeResult, BridgeError> {
        let prompt = format!("{}: {}", task.title, task.description);

        let mut cmd = Command::new(&self.helper_script);
        cmd.arg(&prompt)
            .arg(&self.repo_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        let output = match timeout(CODEX_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(BridgeError::Unavailable(e.to_string())),
            Err(_) => return Err(BridgeError::Timeout("codex subprocess exceeded 300s".into())),
        };

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            Ok(BridgeResult::async_scheduled("pending", stdout))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            Ok(BridgeResult::async_err(stderr))
        }
    }

    async fn health(&self) -> bool {
        self.helper_script.exists()
    }
}

/// Parses a `CODEX_RESULT_<YYYYMMDD_HHMMSS>.md` filename, used by the inbox
/// watcher to recognise codex result drops.
pub fn is_codex_result_filename(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix("CODEX_RESULT_")
        .and_then(|s| s.strip_suffix(".md"))
    else {
        return false;
    };
    stamp.len() == 15
        && stamp.as_bytes()[8] == b'_'
        && stamp[..8].bytes().all(|b| b.is_ascii_digit())
        && stamp[9..].bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_codex_result_filenames() {
        assert!(is_codex_result_filename("CODEX_RESULT_20260727_140512.md"));
        assert!(!is_codex_result_filename("RESULT_abc123_FROM_CLAUDE.md"));
        assert!(!is_codex_result_filename("CODEX_RESULT_bad.md"));
    }
}
