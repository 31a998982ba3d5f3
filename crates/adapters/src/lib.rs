// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete transports to the outside world: bridges to workers, the
//! directory-backed agent registry, and the inbox filesystem watcher.

pub mod bridges;
pub mod registry;
pub mod watcher;

pub use bridges::{Bridge, BridgeError, BridgeResult, ResultMode};
pub use bridges::{ClaudeBridge, CodexBridge, GeminiBridge, OllamaBridge};
pub use registry::{AgentRegistry, RegistryError};
pub use watcher::{start as start_inbox_watcher, InboxFsEvent, InboxWatcherHandle};

#[cfg(any(test, feature = "test-support"))]
pub use bridges::FakeBridge;
