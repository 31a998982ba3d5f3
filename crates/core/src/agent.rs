// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Agent` registry entry: a directory-discovered worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Liveness of a registry entry. External knowledge, never re-derived from
/// a directory scan (§4.2 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Idle,
    Offline,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Idle => "idle",
            AgentStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The transport an agent is reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeKind {
    Ollama,
    Claude,
    Codex,
    Gemini,
    /// A passive human operator; never an auto-routing target.
    Human,
    /// Generic file-drop fallback bridge type.
    File,
}

impl BridgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeKind::Ollama => "ollama",
            BridgeKind::Claude => "claude",
            BridgeKind::Codex => "codex",
            BridgeKind::Gemini => "gemini",
            BridgeKind::Human => "human",
            BridgeKind::File => "file",
        }
    }

    /// Looks up the bridge for an agent directory name using the fixed
    /// name -> bridge map, falling back to `ollama`.
    pub fn from_agent_name(name: &str) -> Self {
        match name {
            "CLAUDE_LUSTRO" => BridgeKind::Claude,
            "GEMINI_ARCHITECT" => BridgeKind::Gemini,
            "CODEX" => BridgeKind::Codex,
            "SHAD" => BridgeKind::Human,
            _ => BridgeKind::Ollama,
        }
    }
}

impl fmt::Display for BridgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A worker capability tag.
pub type Capability = String;

/// A registry entry discovered by scanning the agents directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub role: String,
    pub status: AgentStatus,
    pub capabilities: BTreeSet<Capability>,
    pub bridge_type: BridgeKind,
    pub last_seen: Option<DateTime<Utc>>,
    pub current_task: Option<String>,
    #[serde(default)]
    pub descriptor_raw: String,
}

impl Agent {
    pub fn new(name: impl Into<String>, role: impl Into<String>, bridge_type: BridgeKind) -> Self {
        Agent {
            name: name.into(),
            role: role.into(),
            status: AgentStatus::Idle,
            capabilities: BTreeSet::new(),
            bridge_type,
            last_seen: None,
            current_task: None,
            descriptor_raw: String::new(),
        }
    }

    /// Never offered as an auto-routing target: offline, human-typed, or
    /// already holding a task.
    pub fn is_available_for(&self, capability: Option<&str>) -> bool {
        if self.status == AgentStatus::Offline {
            return false;
        }
        if self.bridge_type == BridgeKind::Human {
            return false;
        }
        if self.current_task.is_some() {
            return false;
        }
        match capability {
            Some(cap) => self.capabilities.contains(cap),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_map_has_fixed_entries() {
        assert_eq!(BridgeKind::from_agent_name("CLAUDE_LUSTRO"), BridgeKind::Claude);
        assert_eq!(BridgeKind::from_agent_name("GEMINI_ARCHITECT"), BridgeKind::Gemini);
        assert_eq!(BridgeKind::from_agent_name("CODEX"), BridgeKind::Codex);
        assert_eq!(BridgeKind::from_agent_name("SHAD"), BridgeKind::Human);
        assert_eq!(BridgeKind::from_agent_name("OLLAMA_WORKER"), BridgeKind::Ollama);
        assert_eq!(BridgeKind::from_agent_name("SOMETHING_ELSE"), BridgeKind::Ollama);
    }

    #[test]
    fn human_agents_never_available() {
        let mut a = Agent::new("SHAD", "human", BridgeKind::Human);
        a.status = AgentStatus::Active;
        assert!(!a.is_available_for(None));
    }

    #[test]
    fn occupied_agents_not_available() {
        let mut a = Agent::new("X", "role", BridgeKind::Ollama);
        a.status = AgentStatus::Active;
        a.current_task = Some("t1".into());
        assert!(!a.is_available_for(None));
    }

    #[test]
    fn offline_agents_not_available() {
        let a = Agent::new("X", "role", BridgeKind::Ollama);
        assert!(a.is_available_for(None)); // idle, not offline, no current task
        let mut offline = a.clone();
        offline.status = AgentStatus::Offline;
        assert!(!offline.is_available_for(None));
    }

    #[test]
    fn capability_filter_respects_set() {
        let mut a = Agent::new("X", "role", BridgeKind::Ollama);
        a.capabilities.insert("code".to_string());
        assert!(a.is_available_for(Some("code")));
        assert!(!a.is_available_for(Some("docs")));
    }
}
