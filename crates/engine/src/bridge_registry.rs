// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BridgeKey -> BridgeImpl` lookup, replacing the string-branching the
//! original dispatch handler did per bridge name (§9).

use relay_adapters::Bridge;
use relay_core::BridgeKind;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a `BridgeKind` to its concrete implementation. `human`/`file` have
/// no bridge implementation — a human-typed agent is never auto-dispatched.
pub struct BridgeRegistry {
    bridges: HashMap<BridgeKind, Arc<dyn Bridge>>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        BridgeRegistry {
            bridges: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: BridgeKind, bridge: Arc<dyn Bridge>) {
        self.bridges.insert(kind, bridge);
    }

    pub fn get(&self, kind: BridgeKind) -> Option<Arc<dyn Bridge>> {
        self.bridges.get(&kind).cloned()
    }
}

impl Default for BridgeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_adapters::FakeBridge;

    #[test]
    fn get_returns_registered_bridge() {
        let mut registry = BridgeRegistry::new();
        registry.register(BridgeKind::Ollama, Arc::new(FakeBridge::new()));
        assert!(registry.get(BridgeKind::Ollama).is_some());
        assert!(registry.get(BridgeKind::Human).is_none());
    }
}
