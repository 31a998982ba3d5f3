// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task CRUD, the dependency DAG, the ready-queue, and persistence.

use chrono::Utc;
use parking_lot::Mutex;
use relay_core::{OrchError, Priority, Result as OrchResult, Task, TaskId, TaskPatch, TaskStatus};
use relay_storage::TaskStore;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{info, warn};

struct Inner {
    tasks: HashMap<String, Task>,
}

/// Owns every `Task` record and its on-disk JSON file. All public methods
/// are serialized under a single lock; reads return defensive copies.
/// Persistence writes happen inside the lock — acceptable throughput for
/// the target workload of at most tens of tasks/sec (§4.1).
pub struct TaskManager {
    store: TaskStore,
    inner: Mutex<Inner>,
}

impl TaskManager {
    /// Loads the table from `path`; an absent or corrupt file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let store = TaskStore::new(path);
        let tasks = match store.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "failed to load task store, starting empty");
                Vec::new()
            }
        };
        let mut map = HashMap::new();
        for t in tasks {
            map.insert(t.id.as_str().to_string(), t);
        }
        TaskManager {
            store,
            inner: Mutex::new(Inner { tasks: map }),
        }
    }

    fn persist(&self, inner: &Inner) -> OrchResult<()> {
        let tasks: Vec<Task> = inner.tasks.values().cloned().collect();
        self.store
            .save(&tasks)
            .map_err(|e| OrchError::Persist(e.to_string()))
    }

    pub fn create(&self, title: impl Into<String>, description: impl Into<String>, priority: Priority) -> OrchResult<Task> {
        let task = Task::new(title, description, priority);
        let mut inner = self.inner.lock();
        inner.tasks.insert(task.id.as_str().to_string(), task.clone());
        self.persist(&inner)?;
        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.inner.lock().tasks.get(id).cloned()
    }

    fn require(&self, inner: &Inner, id: &str) -> OrchResult<Task> {
        inner
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| OrchError::NotFound(format!("task {id}")))
    }

    /// `sort_by` is `"priority"` (critical..low, then created_at ascending)
    /// or anything else, which means created_at descending.
    pub fn list(&self, status: Option<TaskStatus>, agent: Option<&str>, sort_by: Option<&str>) -> Vec<Task> {
        let inner = self.inner.lock();
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .filter(|t| agent.is_none_or(|a| t.assigned_to.as_deref() == Some(a)))
            .cloned()
            .collect();

        match sort_by {
            Some("priority") => {
                tasks.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.created_at.cmp(&b.created_at)))
            }
            _ => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        tasks
    }

    /// Only pending tasks whose dependencies are all `done`, ordered by
    /// priority then `created_at` ascending.
    pub fn pending_queue(&self) -> Vec<Task> {
        let inner = self.inner.lock();
        let done: std::collections::HashSet<&str> = inner
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Done)
            .map(|t| t.id.as_str())
            .collect();

        let mut ready: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .filter(|t| t.depends_on.iter().all(|d| done.contains(d.as_str())))
            .cloned()
            .collect();

        ready.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.created_at.cmp(&b.created_at)));
        ready
    }

    pub fn next_task(&self) -> Option<Task> {
        self.pending_queue().into_iter().next()
    }

    pub fn assign(&self, id: &str, agent: impl Into<String>) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let now = Utc::now();
        let mut task = self.require(&inner, id)?;
        task.assign(agent, now)?;
        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        Ok(task)
    }

    /// Direct transition; caller is responsible for validity per §4.1.
    pub fn update_status(&self, id: &str, status: TaskStatus) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let mut task = self.require(&inner, id)?;
        task.status = status;
        task.touch(Utc::now());
        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        Ok(task)
    }

    pub fn complete(&self, id: &str, result: impl Into<String>) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let mut task = self.require(&inner, id)?;
        task.complete(result, Utc::now());
        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        info!(task_id = %task.id, "task completed");
        Ok(task)
    }

    pub fn fail(&self, id: &str, error: impl Into<String>) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let mut task = self.require(&inner, id)?;
        task.fail(error, Utc::now());
        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        warn!(task_id = %task.id, "task failed");
        Ok(task)
    }

    pub fn cancel(&self, id: &str) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let mut task = self.require(&inner, id)?;
        task.cancel(Utc::now())?;
        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        Ok(task)
    }

    pub fn retry(&self, id: &str) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let mut task = self.require(&inner, id)?;
        task.retry(Utc::now())?;
        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        Ok(task)
    }

    pub fn update(&self, id: &str, patch: TaskPatch) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        let mut task = self.require(&inner, id)?;

        if let Some(v) = patch.title {
            task.title = v;
        }
        if let Some(v) = patch.description {
            task.description = v;
        }
        if let Some(v) = patch.priority {
            task.priority = v;
        }
        if let Some(v) = patch.status {
            task.status = v;
        }
        if let Some(v) = patch.assigned_to {
            task.assigned_to = Some(v);
        }
        if let Some(v) = patch.result {
            task.result = Some(v);
        }
        if let Some(v) = patch.error {
            task.error = Some(v);
        }
        if let Some(v) = patch.task_type {
            task.task_type = Some(v);
        }
        if let Some(v) = patch.depends_on {
            task.depends_on = v;
        }
        task.touch(Utc::now());

        inner.tasks.insert(id.to_string(), task.clone());
        self.persist(&inner)?;
        Ok(task)
    }

    /// Rejects a dependency that would introduce a cycle in the `depends_on`
    /// graph; never mutates on rejection.
    pub fn add_dependency(&self, blocked_id: &str, blocker_id: &str) -> OrchResult<Task> {
        let mut inner = self.inner.lock();
        self.require(&inner, blocked_id)?;
        self.require(&inner, blocker_id)?;

        if would_cycle(&inner.tasks, blocked_id, blocker_id) {
            return Err(OrchError::WouldCycle(format!(
                "{blocked_id} depends_on {blocker_id} would create a cycle"
            )));
        }

        let mut task = self.require(&inner, blocked_id)?;
        task.depends_on.push(TaskId::new(blocker_id));
        task.touch(Utc::now());
        inner.tasks.insert(blocked_id.to_string(), task.clone());
        self.persist(&inner)?;
        Ok(task)
    }

    pub fn is_ready(&self, id: &str) -> bool {
        let inner = self.inner.lock();
        let Some(task) = inner.tasks.get(id) else {
            return false;
        };
        task.is_ready(|dep| {
            inner
                .tasks
                .get(dep.as_str())
                .map(|d| d.status == TaskStatus::Done)
                .unwrap_or(false)
        })
    }

    pub fn get_blocked(&self) -> Vec<Task> {
        let inner = self.inner.lock();
        inner
            .tasks
            .values()
            .filter(|t| {
                !t.depends_on.is_empty()
                    && t.depends_on.iter().any(|dep| {
                        inner
                            .tasks
                            .get(dep.as_str())
                            .map(|d| d.status != TaskStatus::Done)
                            .unwrap_or(true)
                    })
            })
            .cloned()
            .collect()
    }

    pub fn delete(&self, id: &str) -> OrchResult<bool> {
        let mut inner = self.inner.lock();
        let removed = inner.tasks.remove(id).is_some();
        if removed {
            self.persist(&inner)?;
        }
        Ok(removed)
    }

    pub fn stats(&self) -> BTreeMap<String, usize> {
        let inner = self.inner.lock();
        let mut counts = BTreeMap::new();
        for t in inner.tasks.values() {
            *counts.entry(t.status.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

/// Whether adding `blocked -> depends_on -> blocker` would create a cycle:
/// true if `blocked_id` is already reachable from `blocker_id` via the
/// existing `depends_on` edges.
fn would_cycle(tasks: &HashMap<String, Task>, blocked_id: &str, blocker_id: &str) -> bool {
    if blocked_id == blocker_id {
        return true;
    }
    let mut stack = vec![blocker_id.to_string()];
    let mut seen = std::collections::HashSet::new();
    while let Some(current) = stack.pop() {
        if current == blocked_id {
            return true;
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        if let Some(task) = tasks.get(&current) {
            for dep in &task.depends_on {
                stack.push(dep.as_str().to_string());
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager() -> TaskManager {
        let dir = tempdir().unwrap();
        TaskManager::load(dir.path().join("tasks.json"))
    }

    #[test]
    fn create_persists_and_is_retrievable() {
        let mgr = manager();
        let t = mgr.create("title", "desc", Priority::Medium).unwrap();
        let got = mgr.get(t.id.as_str()).unwrap();
        assert_eq!(got.id, t.id);
        assert_eq!(got.status, TaskStatus::Pending);
    }

    #[test]
    fn pending_queue_orders_by_priority_then_created_at() {
        let mgr = manager();
        mgr.create("low prio", "d", Priority::Low).unwrap();
        mgr.create("critical prio", "d", Priority::Critical).unwrap();
        mgr.create("high prio", "d", Priority::High).unwrap();

        let queue = mgr.pending_queue();
        assert_eq!(queue[0].priority, Priority::Critical);
        assert_eq!(queue[1].priority, Priority::High);
        assert_eq!(queue[2].priority, Priority::Low);
    }

    #[test]
    fn dependency_gating_excludes_blocked_tasks_from_queue() {
        let mgr = manager();
        let t3 = mgr.create("T3", "d", Priority::Medium).unwrap();
        let t4 = mgr.create("T4", "d", Priority::Medium).unwrap();
        mgr.add_dependency(t4.id.as_str(), t3.id.as_str()).unwrap();

        let queue = mgr.pending_queue();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, t3.id);

        let blocked = mgr.get_blocked();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, t4.id);

        mgr.assign(t3.id.as_str(), "AGENT").unwrap();
        mgr.update_status(t3.id.as_str(), TaskStatus::Running).unwrap();
        mgr.complete(t3.id.as_str(), "done").unwrap();

        let queue2 = mgr.pending_queue();
        assert_eq!(queue2.len(), 1);
        assert_eq!(queue2[0].id, t4.id);
    }

    #[test]
    fn cycle_rejected_and_graph_unchanged() {
        let mgr = manager();
        let a = mgr.create("A", "d", Priority::Medium).unwrap();
        let b = mgr.create("B", "d", Priority::Medium).unwrap();

        mgr.add_dependency(a.id.as_str(), b.id.as_str()).unwrap();
        let err = mgr.add_dependency(b.id.as_str(), a.id.as_str()).unwrap_err();
        assert!(matches!(err, OrchError::WouldCycle(_)));

        let a_after = mgr.get(a.id.as_str()).unwrap();
        let b_after = mgr.get(b.id.as_str()).unwrap();
        assert_eq!(a_after.depends_on, vec![b.id.clone()]);
        assert!(b_after.depends_on.is_empty());
    }

    #[test]
    fn retry_never_applies_to_non_terminal_task() {
        let mgr = manager();
        let t = mgr.create("t", "d", Priority::Medium).unwrap();
        assert!(mgr.retry(t.id.as_str()).is_err());
    }

    #[test]
    fn not_found_surfaces_for_unknown_id() {
        let mgr = manager();
        let err = mgr.assign("nonexistent", "AGENT").unwrap_err();
        assert!(matches!(err, OrchError::NotFound(_)));
    }

    #[test]
    fn stats_counts_by_status() {
        let mgr = manager();
        mgr.create("a", "d", Priority::Medium).unwrap();
        mgr.create("b", "d", Priority::Medium).unwrap();
        let stats = mgr.stats();
        assert_eq!(stats.get("pending"), Some(&2));
    }
}
