// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Task` record and its lifecycle DAG.

use crate::error::OrchError;
use crate::id::{new_short_id, TaskId};
use crate::priority::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `pending -> assigned -> running -> {done, failed}`. `done`/`failed` are
/// terminal except for an explicit `retry`, which resets to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Assigned,
    Running,
    Done,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }

    /// Whether `self -> next` is a legal step along the lifecycle DAG.
    /// Does not special-case retry; callers that retry go through
    /// `Task::retry`, which resets fields explicitly rather than calling
    /// this transition check.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Assigned, Running)
                | (Assigned, Failed)
                | (Running, Done)
                | (Running, Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
            TaskStatus::Running => "running",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work, owned exclusively by `TaskManager`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub task_type: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
}

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        let now = Utc::now();
        Task {
            id: TaskId::new(new_short_id()),
            title: title.into(),
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
            task_type: None,
            depends_on: Vec::new(),
        }
    }

    /// A task is ready iff it is still pending and every dependency tracked
    /// in the caller's table is `done`. Callers pass the resolver closure so
    /// this stays pure of any storage concern.
    pub fn is_ready<F>(&self, dependency_done: F) -> bool
    where
        F: Fn(&TaskId) -> bool,
    {
        self.status == TaskStatus::Pending && self.depends_on.iter().all(dependency_done)
    }

    pub fn touch(&mut self, clock_now: DateTime<Utc>) {
        self.updated_at = clock_now;
    }

    pub fn assign(&mut self, agent: impl Into<String>, now: DateTime<Utc>) -> Result<(), OrchError> {
        if self.status != TaskStatus::Pending {
            return Err(OrchError::InvalidTransition(format!(
                "cannot assign task in status {}",
                self.status
            )));
        }
        self.assigned_to = Some(agent.into());
        self.status = TaskStatus::Assigned;
        self.touch(now);
        Ok(())
    }

    pub fn set_running(&mut self, now: DateTime<Utc>) -> Result<(), OrchError> {
        if self.status != TaskStatus::Assigned {
            return Err(OrchError::InvalidTransition(format!(
                "cannot run task in status {}",
                self.status
            )));
        }
        self.status = TaskStatus::Running;
        self.touch(now);
        Ok(())
    }

    pub fn complete(&mut self, result: impl Into<String>, now: DateTime<Utc>) {
        self.status = TaskStatus::Done;
        self.result = Some(result.into());
        self.touch(now);
    }

    pub fn fail(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.touch(now);
    }

    /// Cancels a pending or running task: flips to `failed` with a fixed
    /// message and frees the assigned agent. Not a lifecycle transition in
    /// the DAG sense — a soft override, per §5.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), OrchError> {
        if self.status.is_terminal() {
            return Err(OrchError::InvalidTransition(format!(
                "cannot cancel task in terminal status {}",
                self.status
            )));
        }
        self.status = TaskStatus::Failed;
        self.error = Some("Cancelled by user".to_string());
        self.assigned_to = None;
        self.touch(now);
        Ok(())
    }

    /// Resets a terminal task to `pending`, clearing result/error/assigned_to/task_type.
    pub fn retry(&mut self, now: DateTime<Utc>) -> Result<(), OrchError> {
        if !self.status.is_terminal() {
            return Err(OrchError::InvalidTransition(format!(
                "cannot retry task in non-terminal status {}",
                self.status
            )));
        }
        self.status = TaskStatus::Pending;
        self.result = None;
        self.error = None;
        self.assigned_to = None;
        self.task_type = None;
        self.touch(now);
        Ok(())
    }
}

/// A partial patch applied via `TaskManager::update`; `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub task_type: Option<String>,
    pub depends_on: Option<Vec<TaskId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_pending_with_equal_timestamps() {
        let t = Task::new("title", "desc", Priority::Medium);
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.created_at, t.updated_at);
        assert!(t.assigned_to.is_none());
        assert_eq!(t.id.as_str().len(), 12);
    }

    #[test]
    fn assign_then_run_then_complete() {
        let mut t = Task::new("a", "b", Priority::Low);
        let t1 = Utc::now();
        t.assign("AGENT", t1).unwrap();
        assert_eq!(t.status, TaskStatus::Assigned);
        assert_eq!(t.assigned_to.as_deref(), Some("AGENT"));

        t.set_running(t1).unwrap();
        assert_eq!(t.status, TaskStatus::Running);

        t.complete("done text", t1);
        assert_eq!(t.status, TaskStatus::Done);
        assert_eq!(t.result.as_deref(), Some("done text"));
    }

    #[test]
    fn cannot_assign_twice() {
        let mut t = Task::new("a", "b", Priority::Low);
        let now = Utc::now();
        t.assign("X", now).unwrap();
        assert!(t.assign("Y", now).is_err());
    }

    #[test]
    fn retry_clears_fields_and_resets_to_pending() {
        let mut t = Task::new("a", "b", Priority::Low);
        let now = Utc::now();
        t.assign("X", now).unwrap();
        t.set_running(now).unwrap();
        t.fail("boom", now);
        assert!(t.status.is_terminal());

        t.retry(now).unwrap();
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.result.is_none());
        assert!(t.error.is_none());
        assert!(t.assigned_to.is_none());
    }

    #[test]
    fn retry_rejected_unless_terminal() {
        let mut t = Task::new("a", "b", Priority::Low);
        assert!(t.retry(Utc::now()).is_err());
    }

    #[test]
    fn cancel_is_a_soft_override_not_a_dag_transition() {
        let mut t = Task::new("a", "b", Priority::Low);
        let now = Utc::now();
        t.assign("X", now).unwrap();
        t.cancel(now).unwrap();
        assert_eq!(t.status, TaskStatus::Failed);
        assert_eq!(t.error.as_deref(), Some("Cancelled by user"));
        assert!(t.assigned_to.is_none());
    }

    #[test]
    fn cancel_rejected_once_terminal() {
        let mut t = Task::new("a", "b", Priority::Low);
        let now = Utc::now();
        t.assign("X", now).unwrap();
        t.set_running(now).unwrap();
        t.complete("done", now);
        let err = t.cancel(now).unwrap_err();
        assert!(matches!(err, OrchError::InvalidTransition(_)));
        assert_eq!(t.status, TaskStatus::Done);
        assert_eq!(t.result.as_deref(), Some("done"));
    }

    #[test]
    fn is_ready_checks_all_dependencies() {
        let mut t = Task::new("a", "b", Priority::Low);
        t.depends_on = vec![TaskId::new("dep1"), TaskId::new("dep2")];
        assert!(!t.is_ready(|_| false));
        assert!(!t.is_ready(|id| id.as_str() == "dep1"));
        assert!(t.is_ready(|_| true));
    }

    #[test]
    fn is_ready_false_once_no_longer_pending() {
        let mut t = Task::new("a", "b", Priority::Low);
        t.assign("X", Utc::now()).unwrap();
        assert!(!t.is_ready(|_| true));
    }
}
