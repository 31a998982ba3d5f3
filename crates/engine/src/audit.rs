// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only, daily-rotated audit log.
//!
//! One file per day under `<logs>/YYYY-MM-DD.log`, lines:
//! `<iso-ts> | <action:20> | <agent:20> | <task_id:14> | <status:8> | <details>`.
//! Grounded on the workspace's activity-logger idiom: a thin wrapper around
//! `OpenOptions::append` behind a lock, one line per call.

use chrono::Utc;
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct AuditLog {
    log_dir: PathBuf,
    file_lock: Mutex<()>,
}

/// One audit line's fields.
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
    pub action: &'a str,
    pub agent: &'a str,
    pub task_id: &'a str,
    pub status: &'a str,
    pub details: &'a str,
}

impl AuditLog {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        AuditLog {
            log_dir: log_dir.into(),
            file_lock: Mutex::new(()),
        }
    }

    fn path_for_today(&self) -> PathBuf {
        let today = Utc::now().format("%Y-%m-%d");
        self.log_dir.join(format!("{today}.log"))
    }

    pub fn record(&self, entry: AuditEntry<'_>) {
        let _guard = self.file_lock.lock();
        if fs::create_dir_all(&self.log_dir).is_err() {
            return;
        }
        let line = format!(
            "{ts} | {action:<20} | {agent:<20} | {task_id:<14} | {status:<8} | {details}\n",
            ts = Utc::now().to_rfc3339(),
            action = entry.action,
            agent = entry.agent,
            task_id = entry.task_id,
            status = entry.status,
            details = entry.details,
        );
        let path = self.path_for_today();
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
            let _ = file.write_all(line.as_bytes());
        }
    }

    /// Reads up to `limit` most recent lines from today's log file.
    pub fn recent(&self, limit: usize) -> Vec<String> {
        let _guard = self.file_lock.lock();
        let path = self.path_for_today();
        let Ok(content) = fs::read_to_string(&path) else {
            return Vec::new();
        };
        let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
        let start = lines.len().saturating_sub(limit);
        lines.split_off(start)
    }
}
