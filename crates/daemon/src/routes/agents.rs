// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/agents` and its sub-resources.

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use relay_core::OrchError;
use serde_json::{json, Value};

pub async fn list(State(core): State<AppState>) -> Json<Value> {
    let agents = core.registry.get_all();
    Json(json!({"agents": agents, "total": agents.len()}))
}

pub async fn get(State(core): State<AppState>, Path(name): Path<String>) -> AppResult<Json<Value>> {
    let agent = core
        .registry
        .get(&name)
        .ok_or_else(|| OrchError::NotFound(format!("agent {name}")))?;
    Ok(Json(json!(agent)))
}

pub async fn ping(State(core): State<AppState>, Path(name): Path<String>) -> AppResult<Json<Value>> {
    let agent = core
        .registry
        .get(&name)
        .ok_or_else(|| OrchError::NotFound(format!("agent {name}")))?;
    let alive = match core.bridges.get(agent.bridge_type) {
        Some(bridge) => bridge.health().await,
        None => false,
    };
    Ok(Json(json!({"agent": name, "alive": alive, "status": agent.status})))
}

pub async fn refresh(State(core): State<AppState>) -> AppResult<Json<Value>> {
    let agents = core.registry.scan().map_err(|e| AppError(OrchError::Persist(e.to_string())))?;
    Ok(Json(json!(agents)))
}
