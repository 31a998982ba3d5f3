// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LiveEvent`: the shape pushed to every live-feed subscriber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveEventType {
    Init,
    TaskCreate,
    TaskDispatch,
    TaskRunning,
    TaskComplete,
    TaskFailed,
    TaskCancelled,
    TaskRetry,
    Heartbeat,
    Pong,
}

impl fmt::Display for LiveEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LiveEventType::Init => "init",
            LiveEventType::TaskCreate => "task_create",
            LiveEventType::TaskDispatch => "task_dispatch",
            LiveEventType::TaskRunning => "task_running",
            LiveEventType::TaskComplete => "task_complete",
            LiveEventType::TaskFailed => "task_failed",
            LiveEventType::TaskCancelled => "task_cancelled",
            LiveEventType::TaskRetry => "task_retry",
            LiveEventType::Heartbeat => "heartbeat",
            LiveEventType::Pong => "pong",
        };
        write!(f, "{s}")
    }
}

/// One event broadcast to live-feed subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEvent {
    #[serde(rename = "type")]
    pub event_type: LiveEventType,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

impl LiveEvent {
    pub fn new(event_type: LiveEventType, data: Value) -> Self {
        LiveEvent {
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_as_snake_case() {
        let e = LiveEvent::new(LiveEventType::TaskComplete, serde_json::json!({"id": "abc"}));
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "task_complete");
    }
}
