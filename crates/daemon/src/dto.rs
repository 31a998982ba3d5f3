// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response bodies for the `/api/v1` surface.

use relay_core::Priority;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<relay_core::TaskStatus>,
    pub agent: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DispatchRequest {
    pub agent: Option<String>,
    pub bridge: Option<relay_core::BridgeKind>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DebateStartRequest {
    #[serde(default)]
    pub topics: Vec<String>,
    pub agents: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct DebateStartResponse {
    pub session_id: String,
    pub status: &'static str,
}
