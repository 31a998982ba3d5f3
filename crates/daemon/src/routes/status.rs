// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/status`, `/health`, `/logs`, `/routing`.

use crate::dto::LogsQuery;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use relay_core::AgentStatus;
use serde_json::{json, Value};

pub async fn status(State(core): State<AppState>) -> Json<Value> {
    let counts = core.tasks.stats();
    let agents = core.registry.get_all();
    Json(json!({
        "uptime_seconds": core.uptime_seconds(),
        "counts": counts,
        "by_status": counts,
        "agents_total": agents.len(),
    }))
}

pub async fn health(State(core): State<AppState>) -> Json<Value> {
    let ollama = core
        .bridges
        .get(relay_core::BridgeKind::Ollama)
        .map(|b| b.health());
    let ollama_healthy = match ollama {
        Some(fut) => fut.await,
        None => false,
    };

    let agents = core.registry.get_all();
    let agents_active = agents.iter().filter(|a| a.status == AgentStatus::Active).count();
    let agents_idle = agents.iter().filter(|a| a.status == AgentStatus::Idle).count();
    let task_counts = core.tasks.stats();

    Json(json!({
        "builder": "ok",
        "ollama": ollama_healthy,
        "ollama_models": Value::Array(vec![]),
        "agents_total": agents.len(),
        "agents_active": agents_active,
        "agents_idle": agents_idle,
        "tasks_total": task_counts.values().sum::<usize>(),
        "tasks_by_status": task_counts,
        "uptime_seconds": core.uptime_seconds(),
    }))
}

pub async fn logs(State(core): State<AppState>, Query(q): Query<LogsQuery>) -> Json<Value> {
    let limit = q.limit.unwrap_or(100);
    Json(json!(core.audit.recent(limit)))
}

pub async fn routing(State(core): State<AppState>) -> Json<Value> {
    Json(json!(core.dispatcher.routing_table()))
}
