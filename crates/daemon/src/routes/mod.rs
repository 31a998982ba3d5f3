// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles the `/api/v1` router plus the bare `/ws/feed` upgrade.

pub mod agents;
pub mod debate;
pub mod feed;
pub mod status;
pub mod tasks;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub fn build(state: AppState) -> Router {
    let api = Router::new()
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route("/tasks/{id}", get(tasks::get).put(tasks::update).delete(tasks::delete))
        .route("/tasks/{id}/dispatch", post(tasks::dispatch))
        .route("/tasks/{id}/poll", post(tasks::poll))
        .route("/tasks/{id}/retry", post(tasks::retry))
        .route("/tasks/{id}/cancel", post(tasks::cancel))
        .route("/queue", get(tasks::queue))
        .route("/agents", get(agents::list))
        .route("/agents/{name}", get(agents::get))
        .route("/agents/{name}/ping", post(agents::ping))
        .route("/agents/refresh", post(agents::refresh))
        .route("/status", get(status::status))
        .route("/health", get(status::health))
        .route("/logs", get(status::logs))
        .route("/routing", get(status::routing))
        .route("/debate/start", post(debate::start))
        .route("/debate/{id}", get(debate::get))
        .route("/debate/{id}/report", get(debate::report))
        .route("/debate/history", get(debate::history));

    Router::new()
        .nest("/api/v1", api)
        .route("/ws/feed", axum::routing::get(feed::upgrade))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
