// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The static routing table: `task_type -> (agent, bridge, ...)`.

use crate::agent::BridgeKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One routing table entry. The rule table itself is static configuration
/// (§3); `indexmap` keeps declaration order for `GET /routing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRule {
    pub agent_name: String,
    pub bridge: BridgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoutingRule {
    pub fn new(agent_name: impl Into<String>, bridge: BridgeKind) -> Self {
        RoutingRule {
            agent_name: agent_name.into(),
            bridge,
            model: None,
            temperature: None,
            system_prompt: None,
            description: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_description(mut self, d: impl Into<String>) -> Self {
        self.description = Some(d.into());
        self
    }
}

/// `task_type -> RoutingRule`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingTable(pub IndexMap<String, RoutingRule>);

impl RoutingTable {
    pub fn get(&self, task_type: &str) -> Option<&RoutingRule> {
        self.0.get(task_type)
    }

    pub fn insert(&mut self, task_type: impl Into<String>, rule: RoutingRule) {
        self.0.insert(task_type.into(), rule);
    }

    /// The default routing table, grounded on the original system's
    /// `_BRIDGE_MAP` and the spec's named capability vocabulary.
    pub fn default_table(default_model: impl Into<String>) -> Self {
        let model = default_model.into();
        let mut table = RoutingTable::default();
        table.insert(
            "code_simple",
            RoutingRule::new("OLLAMA_WORKER", BridgeKind::Ollama)
                .with_model(model.clone())
                .with_temperature(0.3)
                .with_description("Simple, well-scoped code tasks"),
        );
        table.insert(
            "code_complex",
            RoutingRule::new("CLAUDE_LUSTRO", BridgeKind::Claude)
                .with_description("Multi-file or architecturally sensitive code tasks"),
        );
        table.insert(
            "review",
            RoutingRule::new("CLAUDE_LUSTRO", BridgeKind::Claude)
                .with_description("Code review and critique"),
        );
        table.insert(
            "architecture",
            RoutingRule::new("GEMINI_ARCHITECT", BridgeKind::Gemini)
                .with_description("System design and architecture"),
        );
        table.insert(
            "docs",
            RoutingRule::new("OLLAMA_WORKER", BridgeKind::Ollama)
                .with_model(model.clone())
                .with_temperature(0.4)
                .with_description("Documentation writing"),
        );
        table.insert(
            "test",
            RoutingRule::new("CODEX", BridgeKind::Codex).with_description("Test authoring"),
        );
        table.insert(
            "reasoning",
            RoutingRule::new("GEMINI_ARCHITECT", BridgeKind::Gemini)
                .with_description("Open-ended reasoning and analysis"),
        );
        table.insert(
            "quick",
            RoutingRule::new("OLLAMA_WORKER", BridgeKind::Ollama)
                .with_model(model)
                .with_temperature(0.2)
                .with_description("Short factual questions"),
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_fallback_type() {
        let table = RoutingTable::default_table("llama3");
        assert!(table.get("code_simple").is_some());
    }

    #[test]
    fn unknown_type_has_no_rule() {
        let table = RoutingTable::default_table("llama3");
        assert!(table.get("security_audit").is_none());
    }
}
