// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/debate/*`.

use crate::dto::{DebateStartRequest, DebateStartResponse};
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use relay_core::OrchError;
use serde_json::{json, Value};

pub async fn start(State(core): State<AppState>, Json(req): Json<DebateStartRequest>) -> Json<Value> {
    let topics = if req.topics.is_empty() {
        vec!["general discussion".to_string()]
    } else {
        req.topics
    };

    let participants: Vec<relay_core::Agent> = match req.agents {
        Some(names) => names.into_iter().filter_map(|n| core.registry.get(&n)).collect(),
        None => core.registry.get_all(),
    };

    let session = core.start_debate(topics, None);
    let session_id = session.id.as_str().to_string();

    let core_clone = std::sync::Arc::clone(&core);
    tokio::spawn(async move {
        let completed = core_clone.debate_engine.run(session, &participants).await;
        core_clone.store_debate(completed);
    });

    Json(json!(DebateStartResponse {
        session_id,
        status: "running",
    }))
}

pub async fn get(State(core): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, AppError> {
    let session = core.get_debate(&id).ok_or_else(|| OrchError::NotFound(format!("debate {id}")))?;
    Ok(Json(json!(session)))
}

pub async fn report(State(core): State<AppState>, Path(id): Path<String>) -> Result<String, AppError> {
    let session = core.get_debate(&id).ok_or_else(|| OrchError::NotFound(format!("debate {id}")))?;
    Ok(session.to_markdown_report())
}

pub async fn history(State(core): State<AppState>) -> Json<Value> {
    let sessions: Vec<_> = core
        .list_debates()
        .into_iter()
        .map(|s| json!({"id": s.id, "status": s.status, "topics": s.topics, "started_at": s.started_at}))
        .collect();
    Json(json!(sessions))
}
