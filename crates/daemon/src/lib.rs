// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface, configuration, and boot wiring for the orchestrator daemon.
//! The domain logic lives in `relay-engine`; this crate is glue (§1 — HTTP
//! framework plumbing, CORS, and the boot banner are explicitly ambient).

pub mod boot;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;

use relay_adapters::{start_inbox_watcher, AgentRegistry, ClaudeBridge, CodexBridge, GeminiBridge, InboxWatcherHandle, OllamaBridge};
use relay_core::{BridgeKind, RoutingTable};
use relay_engine::{AuditLog, BridgeRegistry, Core, DebateEngine, Dispatcher, LiveFeed, TaskManager};
use std::sync::Arc;

/// Builds every component described by a `Config` into a ready `Core`, and
/// spawns the inbox-watcher consumer loop on the current runtime. The
/// returned watcher handle must be kept alive by the caller for the process
/// lifetime — dropping it stops the filesystem watch.
pub fn build_core(config: &Config) -> (Arc<Core>, Option<InboxWatcherHandle>) {
    let tasks = TaskManager::load(config.tasks_path());
    let registry = AgentRegistry::new(&config.agents_dir);
    if let Err(e) = registry.scan() {
        tracing::warn!(error = %e, "initial agent registry scan failed");
    }

    let dispatcher = Dispatcher::new(RoutingTable::default_table(&config.default_model));

    let ollama = Arc::new(OllamaBridge::new(
        config.ollama_url.clone(),
        config.default_model.clone(),
        config.ollama_timeout,
    ));
    let mut bridges = BridgeRegistry::new();
    bridges.register(BridgeKind::Ollama, ollama.clone());
    bridges.register(BridgeKind::Claude, Arc::new(ClaudeBridge::new(&config.inbox_dir)));
    bridges.register(BridgeKind::Gemini, Arc::new(GeminiBridge::new(&config.inbox_dir)));
    bridges.register(
        BridgeKind::Codex,
        Arc::new(CodexBridge::new(config.state_dir.join("codex_helper.sh"), std::env::current_dir().unwrap_or_default())),
    );

    let live_feed = Arc::new(LiveFeed::new());
    let audit = AuditLog::new(config.logs_dir());
    let debate_engine = DebateEngine::new(ollama);

    let core = Arc::new(Core::new(tasks, registry, dispatcher, bridges, live_feed, audit, debate_engine));

    let (tx, rx) = tokio::sync::mpsc::channel(256);
    let watcher_handle = match start_inbox_watcher(&config.inbox_dir, &config.agents_dir, tx) {
        Ok(handle) => {
            let core_for_consumer = Arc::clone(&core);
            tokio::spawn(async move {
                relay_engine::inbox_consumer::run(&core_for_consumer, rx).await;
            });
            Some(handle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "inbox watcher failed to start; async bridges will rely on /poll only");
            None
        }
    };

    (core, watcher_handle)
}
