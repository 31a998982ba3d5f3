// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disk persistence for the task table: one atomically-written JSON document.

pub mod task_store;

pub use task_store::{StoreError, TaskStore, SCHEMA_VERSION};
