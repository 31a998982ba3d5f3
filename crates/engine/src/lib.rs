// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateful orchestration: task management, dispatch, bridges, the live
//! feed, audit logging, and multi-agent debate — bundled behind [`Core`].

pub mod audit;
pub mod bridge_registry;
pub mod core;
pub mod debate_engine;
pub mod dispatcher;
pub mod inbox_consumer;
pub mod live_feed;
pub mod task_manager;

pub use audit::{AuditEntry, AuditLog};
pub use bridge_registry::BridgeRegistry;
pub use core::Core;
pub use debate_engine::DebateEngine;
pub use dispatcher::{
    classify, classify_with_llm, confidence_for, needs_second_opinion, Classification, DispatchOverrides,
    Dispatcher, RoutingDecision, FALLBACK_TYPE, UNIVERSAL_FALLBACK_AGENT,
};
pub use live_feed::{LiveFeed, SharedLiveFeed};
pub use task_manager::TaskManager;
