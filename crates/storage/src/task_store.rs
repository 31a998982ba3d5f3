// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic JSON-document persistence for the task table.
//!
//! The entire table is a single JSON document: `{schema_version, tasks: [...]}`.
//! Every mutation writes the whole document atomically (temp file + fsync +
//! rename), matching the snapshot technique used elsewhere in this
//! workspace for crash-safe writes, without the WAL/replay machinery —
//! this store re-serializes in full on every save instead of replaying
//! an event log.

use relay_core::Task;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The on-disk document shape. `schema_version` is written up front so
/// future format changes have somewhere to branch from.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskDocument {
    schema_version: u32,
    tasks: Vec<Task>,
}

/// Loads and atomically persists the task table at a fixed path.
///
/// Holds no lock of its own — callers (`TaskManager`) serialize access;
/// this type only knows how to get bytes on and off disk safely.
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    /// Loads the task table from disk.
    ///
    /// If the file is absent, returns an empty table. If it is corrupt,
    /// logs and returns an empty table without touching the file — the
    /// first successful save is what overwrites it.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, TaskDocument>(reader) {
            Ok(doc) => Ok(doc.tasks),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "corrupt task store, starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Atomically persists the full task table: write to `<path>.tmp`,
    /// flush + fsync, then rename over the target.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let doc = TaskDocument {
            schema_version: SCHEMA_VERSION,
            tasks: tasks.to_vec(),
        };

        let tmp_path = self.path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &doc)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::Priority;
    use tempfile::tempdir;

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        let t = Task::new("a", "b", Priority::High);
        store.save(&[t.clone()]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, t.id);
    }

    #[test]
    fn save_is_atomic_no_tmp_left_behind() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        store.save(&[]).unwrap();
        assert!(!dir.path().join("tasks.tmp").exists());
        assert!(dir.path().join("tasks.json").exists());
    }

    #[test]
    fn corrupt_file_loads_as_empty_without_overwriting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, b"not json at all").unwrap();
        let store = TaskStore::new(path.clone());

        let loaded = store.load().unwrap();
        assert!(loaded.is_empty());
        // the corrupt bytes are left untouched until the next successful save
        assert_eq!(fs::read(&path).unwrap(), b"not json at all");
    }
}
