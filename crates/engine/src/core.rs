// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Core`: the explicit context bundling every component, passed to every
//! HTTP handler instead of module-level singletons (§9).

use crate::audit::{AuditEntry, AuditLog};
use crate::bridge_registry::BridgeRegistry;
use crate::debate_engine::DebateEngine;
use crate::dispatcher::{DispatchOverrides, Dispatcher, RoutingDecision};
use crate::live_feed::LiveFeed;
use crate::task_manager::TaskManager;
use parking_lot::Mutex;
use relay_adapters::AgentRegistry;
use relay_core::{
    AgentStatus, DebateId, DebateSession, LiveEventType, OrchError, Result as OrchResult, Task, TaskStatus,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// The explicit handle every HTTP route and background task is passed.
pub struct Core {
    pub tasks: TaskManager,
    pub registry: AgentRegistry,
    pub dispatcher: Dispatcher,
    pub bridges: BridgeRegistry,
    pub live_feed: Arc<LiveFeed>,
    pub audit: AuditLog,
    pub debate_engine: DebateEngine,
    debates: Mutex<HashMap<String, DebateSession>>,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl Core {
    pub fn new(
        tasks: TaskManager,
        registry: AgentRegistry,
        dispatcher: Dispatcher,
        bridges: BridgeRegistry,
        live_feed: Arc<LiveFeed>,
        audit: AuditLog,
        debate_engine: DebateEngine,
    ) -> Self {
        Core {
            tasks,
            registry,
            dispatcher,
            bridges,
            live_feed,
            audit,
            debate_engine,
            debates: Mutex::new(HashMap::new()),
            started_at: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// Creates a task and broadcasts its `task_create` event. Routes call
    /// this instead of `self.tasks.create` directly so every task's
    /// lifecycle on the feed starts here (§8 scenario 1).
    pub fn create_task(&self, title: impl Into<String>, description: impl Into<String>, priority: relay_core::Priority) -> OrchResult<Task> {
        let task = self.tasks.create(title, description, priority)?;
        self.live_feed.broadcast(LiveEventType::TaskCreate, json!({"task_id": task.id.as_str(), "title": task.title}));
        Ok(task)
    }

    /// Classifies, routes, assigns, and delivers a task to its bridge.
    /// Holds the task-manager lock only across in-memory mutation, never
    /// across the bridge call itself (§5).
    pub async fn dispatch_task(&self, task_id: &str, overrides: DispatchOverrides) -> OrchResult<(RoutingDecision, Task)> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| OrchError::NotFound(format!("task {task_id}")))?;

        if !self.tasks.is_ready(task_id) {
            return Err(OrchError::InvalidTransition(format!(
                "task {task_id} is not ready: unmet dependencies"
            )));
        }

        let decision = self
            .dispatcher
            .dispatch(&task.title, &task.description, Some(&self.registry), overrides);

        if decision.busy {
            return Err(OrchError::Busy(format!(
                "no available agent for task type {}",
                decision.task_type
            )));
        }

        self.tasks.update(
            task_id,
            relay_core::TaskPatch {
                task_type: Some(decision.task_type.clone()),
                ..Default::default()
            },
        )?;
        let task = self.tasks.assign(task_id, decision.agent.clone())?;
        self.registry
            .update_status(&decision.agent, AgentStatus::Active, Some(task_id.to_string()));
        self.live_feed.broadcast(
            LiveEventType::TaskDispatch,
            json!({"task_id": task_id, "agent": decision.agent, "task_type": decision.task_type}),
        );

        let bridge = self
            .bridges
            .get(decision.bridge)
            .ok_or_else(|| OrchError::BridgeUnavailable(format!("no bridge for {}", decision.bridge)))?;

        let task = self.tasks.update_status(task_id, TaskStatus::Running)?;
        self.live_feed
            .broadcast(LiveEventType::TaskRunning, json!({"task_id": task_id}));

        let result = bridge
            .execute(&task)
            .await
            .map_err(|e| OrchError::BridgeUnavailable(e.to_string()))?;

        let task = if result.success {
            match result.response {
                Some(response) => {
                    let completed = self.tasks.complete(task_id, response)?;
                    self.registry.update_status(&decision.agent, AgentStatus::Idle, None);
                    self.audit.record(AuditEntry {
                        action: "dispatch",
                        agent: &decision.agent,
                        task_id,
                        status: "done",
                        details: "synchronous bridge completed",
                    });
                    self.live_feed.broadcast(
                        LiveEventType::TaskComplete,
                        json!({"task_id": task_id, "agent": decision.agent, "status": "done"}),
                    );
                    completed
                }
                None => {
                    // Async file-drop bridge: stays running until InboxWatcher picks it up.
                    self.audit.record(AuditEntry {
                        action: "dispatch",
                        agent: &decision.agent,
                        task_id,
                        status: "running",
                        details: result.message.as_deref().unwrap_or("scheduled"),
                    });
                    task
                }
            }
        } else {
            let failed = self
                .tasks
                .fail(task_id, result.error.unwrap_or_else(|| "bridge failure".to_string()))?;
            self.registry.update_status(&decision.agent, AgentStatus::Idle, None);
            self.live_feed
                .broadcast(LiveEventType::TaskFailed, json!({"task_id": task_id}));
            failed
        };

        Ok((decision, task))
    }

    /// Polls a file-drop/subprocess bridge's result for a task still `running`.
    pub async fn poll_task(&self, task_id: &str) -> OrchResult<Task> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| OrchError::NotFound(format!("task {task_id}")))?;

        if task.status != TaskStatus::Running {
            return Ok(task);
        }

        let Some(agent_name) = task.assigned_to.clone() else {
            return Ok(task);
        };
        let Some(agent) = self.registry.get(&agent_name) else {
            return Ok(task);
        };
        let Some(bridge) = self.bridges.get(agent.bridge_type) else {
            return Ok(task);
        };

        match bridge.check_result(&task).await {
            Ok(Some(result)) if result.success => {
                let response = result.response.unwrap_or_default();
                let completed = self.tasks.complete(task_id, response)?;
                self.registry.update_status(&agent_name, AgentStatus::Idle, None);
                self.live_feed.broadcast(
                    LiveEventType::TaskComplete,
                    json!({"task_id": task_id, "agent": agent_name, "status": "done"}),
                );
                Ok(completed)
            }
            Ok(Some(result)) => {
                let failed = self.tasks.fail(task_id, result.error.unwrap_or_default())?;
                self.registry.update_status(&agent_name, AgentStatus::Idle, None);
                Ok(failed)
            }
            Ok(None) => Ok(task),
            Err(e) => Err(OrchError::BridgeUnavailable(e.to_string())),
        }
    }

    pub fn cancel_task(&self, task_id: &str) -> OrchResult<Task> {
        let task = self.tasks.cancel(task_id)?;
        if let Some(agent) = &task.assigned_to {
            self.registry.update_status(agent, AgentStatus::Idle, None);
        }
        self.live_feed
            .broadcast(LiveEventType::TaskCancelled, json!({"task_id": task_id}));
        Ok(task)
    }

    pub fn retry_task(&self, task_id: &str) -> OrchResult<Task> {
        let task = self.tasks.retry(task_id)?;
        self.live_feed
            .broadcast(LiveEventType::TaskRetry, json!({"task_id": task_id}));
        Ok(task)
    }

    pub fn start_debate(&self, topics: Vec<String>, agent_names: Option<Vec<String>>) -> DebateSession {
        let session = DebateSession::new(topics);
        self.debates.lock().insert(session.id.as_str().to_string(), session.clone());
        let _ = agent_names; // participant selection resolved by the caller before spawning `run`
        session
    }

    pub fn store_debate(&self, session: DebateSession) {
        self.debates.lock().insert(session.id.as_str().to_string(), session);
    }

    pub fn get_debate(&self, id: &str) -> Option<DebateSession> {
        self.debates.lock().get(id).cloned()
    }

    pub fn list_debates(&self) -> Vec<DebateSession> {
        self.debates.lock().values().cloned().collect()
    }

    pub fn new_debate_id() -> DebateId {
        DebateId::default()
    }
}
