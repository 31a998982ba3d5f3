// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/ws/feed`: subscribes to the live feed and forwards events as JSON text
//! frames. Replies to a `"ping"` control message with `"pong"`; if nothing
//! arrives for 30s, sends a `heartbeat` event (§4.6).

use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use relay_core::LiveEventType;
use serde_json::json;
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn upgrade(ws: WebSocketUpgrade, State(core): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, core))
}

async fn handle_socket(mut socket: WebSocket, core: AppState) {
    let snapshot = json!({
        "agents": core.registry.get_all(),
        "tasks": core.tasks.list(None, None, None),
    });
    let mut rx = core.live_feed.subscribe(snapshot);

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let Ok(text) = serde_json::to_string(&event) else { continue };
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) if text == "ping" => {
                        if socket.send(Message::Text("pong".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
            _ = tokio::time::sleep(PING_TIMEOUT) => {
                let heartbeat = relay_core::LiveEvent::new(LiveEventType::Heartbeat, json!({}));
                let Ok(text) = serde_json::to_string(&heartbeat) else { continue };
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    }
}
