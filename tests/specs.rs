// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios against the full HTTP surface, in-process — no
//! subprocess, no network. Grounded on `gator-cli`'s `serve_cmd.rs` tests:
//! build the router, drive it with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use relay_adapters::{AgentRegistry, ClaudeBridge, FakeBridge, GeminiBridge, OllamaBridge};
use relay_core::BridgeKind;
use relay_engine::{AuditLog, BridgeRegistry, Core, DebateEngine, Dispatcher, LiveFeed, TaskManager};

fn write_agent(agents_dir: &std::path::Path, name: &str, descriptor: &str) {
    let dir = agents_dir.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("WHO_AM_I.md"), descriptor).unwrap();
}

struct Fixture {
    core: Arc<Core>,
    inbox_dir: std::path::PathBuf,
    ollama: Arc<FakeBridge>,
    _tmp: tempfile::TempDir,
}

fn build_fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let agents_dir = tmp.path().join("agents");
    let inbox_dir = tmp.path().join("inbox");
    std::fs::create_dir_all(&agents_dir).unwrap();
    std::fs::create_dir_all(&inbox_dir).unwrap();

    write_agent(&agents_dir, "OLLAMA_WORKER", "# Engineer\n\nHandles code tasks.");
    write_agent(&agents_dir, "CLAUDE_LUSTRO", "# Engineer\n\nHandles code review and refactors.");
    write_agent(&agents_dir, "GEMINI_ARCHITECT", "# Architect\n\nSystem design work.");

    let registry = AgentRegistry::new(&agents_dir);
    registry.scan().unwrap();

    let tasks = TaskManager::load(tmp.path().join("tasks.json"));
    let dispatcher = Dispatcher::new(relay_core::RoutingTable::default_table("llama3"));

    let ollama = Arc::new(FakeBridge::new());
    let mut bridges = BridgeRegistry::new();
    bridges.register(BridgeKind::Ollama, ollama.clone());
    bridges.register(BridgeKind::Claude, Arc::new(ClaudeBridge::new(&inbox_dir)));
    bridges.register(BridgeKind::Gemini, Arc::new(GeminiBridge::new(&inbox_dir)));

    let live_feed = Arc::new(LiveFeed::new());
    let audit = AuditLog::new(tmp.path().join("logs"));
    let debate_engine = DebateEngine::new(Arc::new(OllamaBridge::new("http://127.0.0.1:1", "llama3", Duration::from_secs(1))));

    let core = Arc::new(Core::new(tasks, registry, dispatcher, bridges, live_feed, audit, debate_engine));

    Fixture { core, inbox_dir, ollama, _tmp: tmp }
}

async fn send(core: Arc<Core>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = relay_daemon::routes::build(core);
    let mut builder = Request::builder().method(method).uri(uri);
    builder = builder.header("content-type", "application/json");
    let request = match body {
        Some(b) => builder.body(Body::from(serde_json::to_vec(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn synchronous_inference_path_completes_immediately() {
    let fx = build_fixture();
    fx.ollama.push_result(Ok(relay_adapters::BridgeResult::sync_ok("def fib(n):...")));

    let mut feed = fx.core.live_feed.subscribe(json!({}));
    let _ = feed.recv().await; // drain init

    let (status, created) = send(
        fx.core.clone(),
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "write a fibonacci function", "description": "in python", "priority": "medium", "assigned_to": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, dispatched) = send(fx.core.clone(), "POST", &format!("/api/v1/tasks/{id}/dispatch"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dispatched["routing"]["task_type"], "code_simple");
    assert_eq!(dispatched["routing"]["agent"], "OLLAMA_WORKER");
    assert_eq!(dispatched["task"]["status"], "done");
    assert_eq!(dispatched["task"]["result"], "def fib(n):...");

    use relay_core::LiveEventType;
    let order = [LiveEventType::TaskCreate, LiveEventType::TaskDispatch, LiveEventType::TaskRunning, LiveEventType::TaskComplete];
    for expected in order {
        let event = feed.recv().await.expect("expected live feed event");
        assert_eq!(event.event_type, expected);
    }
}

#[tokio::test]
async fn file_drop_path_picked_up_by_inbox_watcher() {
    let fx = build_fixture();

    let (_, created) = send(
        fx.core.clone(),
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "refactor the auth layer for security", "description": "harden session handling", "priority": "high", "assigned_to": null})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, dispatched) = send(fx.core.clone(), "POST", &format!("/api/v1/tasks/{id}/dispatch"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dispatched["routing"]["agent"], "CLAUDE_LUSTRO");
    assert_eq!(dispatched["task"]["status"], "running");

    let task_file = fx.inbox_dir.join(format!("TASK_{id}_FOR_CLAUDE_LUSTRO.md"));
    assert!(task_file.exists());

    let (tx, rx) = tokio::sync::mpsc::channel(16);
    let core_for_consumer = fx.core.clone();
    let consumer = tokio::spawn(async move {
        relay_engine::inbox_consumer::run(&core_for_consumer, rx).await;
    });

    let result_file = fx.inbox_dir.join(format!("RESULT_{id}_FROM_CLAUDE_LUSTRO.md"));
    std::fs::write(&result_file, "done: see patch").unwrap();
    tx.send(relay_adapters::InboxFsEvent::InboxFileCreated(result_file.clone())).await.unwrap();

    for _ in 0..50 {
        let (_, task) = send(fx.core.clone(), "GET", &format!("/api/v1/tasks/{id}"), None).await;
        if task["status"] == "done" {
            assert_eq!(task["result"], "done: see patch");
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let (_, task) = send(fx.core.clone(), "GET", &format!("/api/v1/tasks/{id}"), None).await;
    assert_eq!(task["status"], "done");

    assert!(!result_file.exists());
    assert!(fx.inbox_dir.join("DONE").join(format!("RESULT_{id}_FROM_CLAUDE_LUSTRO.md")).exists());
    assert!(fx.inbox_dir.join("DONE").join(format!("TASK_{id}_FOR_CLAUDE_LUSTRO.md")).exists());

    drop(tx);
    let _ = consumer.await;
}

#[tokio::test]
async fn dependency_gating_hides_blocked_task_from_the_queue() {
    let fx = build_fixture();

    let (_, t3) = send(fx.core.clone(), "POST", "/api/v1/tasks", Some(json!({"title": "t3", "description": "d", "priority": "medium", "assigned_to": null}))).await;
    let (_, t4) = send(fx.core.clone(), "POST", "/api/v1/tasks", Some(json!({"title": "t4", "description": "d", "priority": "medium", "assigned_to": null}))).await;
    let t3_id = t3["id"].as_str().unwrap().to_string();
    let t4_id = t4["id"].as_str().unwrap().to_string();

    fx.core.tasks.add_dependency(&t4_id, &t3_id).unwrap();

    let (_, queue) = send(fx.core.clone(), "GET", "/api/v1/queue", None).await;
    let ids: Vec<&str> = queue.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&t3_id.as_str()));
    assert!(!ids.contains(&t4_id.as_str()));

    assert!(fx.core.tasks.get_blocked().iter().any(|t| t.id.as_str() == t4_id));

    fx.core.tasks.complete(&t3_id, "done").unwrap();
    let (_, queue) = send(fx.core.clone(), "GET", "/api/v1/queue", None).await;
    let ids: Vec<&str> = queue.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&t4_id.as_str()));
}

#[tokio::test]
async fn cyclic_dependency_is_rejected_and_graph_is_unchanged() {
    let fx = build_fixture();

    let (_, a) = send(fx.core.clone(), "POST", "/api/v1/tasks", Some(json!({"title": "a", "description": "d", "priority": "medium", "assigned_to": null}))).await;
    let (_, b) = send(fx.core.clone(), "POST", "/api/v1/tasks", Some(json!({"title": "b", "description": "d", "priority": "medium", "assigned_to": null}))).await;
    let a_id = a["id"].as_str().unwrap().to_string();
    let b_id = b["id"].as_str().unwrap().to_string();

    fx.core.tasks.add_dependency(&a_id, &b_id).unwrap();
    let err = fx.core.tasks.add_dependency(&b_id, &a_id).unwrap_err();
    assert!(matches!(err, relay_core::OrchError::WouldCycle(_)));

    let a_after = fx.core.tasks.get(&a_id).unwrap();
    let b_after = fx.core.tasks.get(&b_id).unwrap();
    assert_eq!(a_after.depends_on.len(), 1);
    assert_eq!(a_after.depends_on[0].as_str(), b_id);
    assert!(b_after.depends_on.is_empty());
}

#[tokio::test]
async fn cancel_during_async_wins_the_race_against_a_late_result_file() {
    let fx = build_fixture();

    let (_, created) = send(
        fx.core.clone(),
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "refactor the payments architecture", "description": "design the new flow", "priority": "high", "assigned_to": null})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (_, dispatched) = send(fx.core.clone(), "POST", &format!("/api/v1/tasks/{id}/dispatch"), Some(json!({}))).await;
    assert_eq!(dispatched["task"]["status"], "running");

    let (_, cancelled) = send(fx.core.clone(), "POST", &format!("/api/v1/tasks/{id}/cancel"), None).await;
    assert_eq!(cancelled["task"]["status"], "failed");
    assert_eq!(cancelled["task"]["error"], "Cancelled by user");

    let mut feed = fx.core.live_feed.subscribe(json!({}));
    let _ = feed.recv().await; // drain init

    let agent = dispatched["routing"]["agent"].as_str().unwrap().to_string();
    let result_file = fx.inbox_dir.join(format!("RESULT_{id}_FROM_{agent}.md"));
    std::fs::write(&result_file, "too late").unwrap();

    let (tx, rx) = tokio::sync::mpsc::channel(16);
    let core_for_consumer = fx.core.clone();
    let consumer = tokio::spawn(async move {
        relay_engine::inbox_consumer::run(&core_for_consumer, rx).await;
    });
    tx.send(relay_adapters::InboxFsEvent::InboxFileCreated(result_file)).await.unwrap();
    drop(tx);
    let _ = consumer.await;

    let task = fx.core.tasks.get(&id).unwrap();
    assert_eq!(task.status, relay_core::TaskStatus::Failed);

    assert!(tokio::time::timeout(Duration::from_millis(50), feed.recv()).await.is_err(), "no event should have been broadcast for the late result");
}

#[tokio::test]
async fn busy_primary_agent_falls_back_to_the_idle_ollama_worker() {
    let fx = build_fixture();

    let (_, first) = send(
        fx.core.clone(),
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "refactor the billing module", "description": "multi-file migration", "priority": "high", "assigned_to": null})),
    )
    .await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let (_, first_dispatch) = send(fx.core.clone(), "POST", &format!("/api/v1/tasks/{first_id}/dispatch"), Some(json!({}))).await;
    assert_eq!(first_dispatch["routing"]["agent"], "CLAUDE_LUSTRO");
    assert_eq!(first_dispatch["task"]["status"], "running");

    let (_, second) = send(
        fx.core.clone(),
        "POST",
        "/api/v1/tasks",
        Some(json!({"title": "refactor the reporting module", "description": "multi-file migration", "priority": "high", "assigned_to": null})),
    )
    .await;
    let second_id = second["id"].as_str().unwrap().to_string();
    let (status, second_dispatch) = send(fx.core.clone(), "POST", &format!("/api/v1/tasks/{second_id}/dispatch"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second_dispatch["routing"]["fallback"], true);
    assert_eq!(second_dispatch["routing"]["agent"], "OLLAMA_WORKER");
    assert_eq!(second_dispatch["routing"]["bridge"], "ollama");
}
