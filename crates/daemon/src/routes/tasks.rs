// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/tasks` and its sub-resources.

use crate::dto::{CreateTaskRequest, DispatchRequest, ListTasksQuery};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use relay_core::{OrchError, TaskPatch};
use serde_json::{json, Value};

pub async fn create(State(core): State<AppState>, Json(req): Json<CreateTaskRequest>) -> AppResult<Json<Value>> {
    let task = core.create_task(req.title, req.description, req.priority)?;
    let task = match req.assigned_to {
        Some(agent) => core.tasks.assign(task.id.as_str(), agent)?,
        None => task,
    };
    Ok(Json(json!(task)))
}

pub async fn list(State(core): State<AppState>, Query(q): Query<ListTasksQuery>) -> Json<Value> {
    let tasks = core.tasks.list(q.status, q.agent.as_deref(), q.sort_by.as_deref());
    Json(json!(tasks))
}

pub async fn get(State(core): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let task = core.tasks.get(&id).ok_or_else(|| OrchError::NotFound(format!("task {id}")))?;
    Ok(Json(json!(task)))
}

pub async fn update(
    State(core): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> AppResult<Json<Value>> {
    let task = core.tasks.update(&id, patch)?;
    Ok(Json(json!(task)))
}

pub async fn delete(State(core): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let deleted = core.tasks.delete(&id)?;
    if !deleted {
        return Err(AppError(OrchError::NotFound(format!("task {id}"))));
    }
    Ok(Json(json!({"deleted": true})))
}

pub async fn dispatch(
    State(core): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DispatchRequest>,
) -> AppResult<Json<Value>> {
    let overrides = relay_engine::DispatchOverrides {
        agent: req.agent,
        bridge: req.bridge,
        model: req.model,
    };
    let (decision, task) = core.dispatch_task(&id, overrides).await?;
    Ok(Json(json!({"routing": decision, "result": task.result, "task": task})))
}

pub async fn poll(State(core): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let task = core.poll_task(&id).await?;
    Ok(Json(json!({
        "status": task.status,
        "result": task.result,
        "message": task.error,
        "task": task,
    })))
}

pub async fn retry(State(core): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    core.retry_task(&id)?;
    let (decision, task) = core.dispatch_task(&id, relay_engine::DispatchOverrides::default()).await?;
    Ok(Json(json!({"routing": decision, "result": task.result, "task": task})))
}

pub async fn cancel(State(core): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let task = core.cancel_task(&id)?;
    Ok(Json(json!({"cancelled": true, "task": task})))
}

pub async fn queue(State(core): State<AppState>) -> Json<Value> {
    Json(json!(core.tasks.pending_queue()))
}
