// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed agent discovery.

use parking_lot::RwLock;
use regex::Regex;
use relay_core::{Agent, AgentStatus, BridgeKind};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;
use thiserror::Error;

/// The descriptor filename a subdirectory must contain to count as an agent.
pub const DESCRIPTOR_FILENAME: &str = "WHO_AM_I.md";
/// The optional state-log filename used to derive `last_seen`.
pub const STATE_LOG_FILENAME: &str = "STATE.log";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn role_keyword_headings() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^#{1,6}\s*.*\b(architect|engineer|builder|source|mirror)\b.*$").expect("valid regex")
    })
}

fn capability_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            ("code", Regex::new(r"(?i)\bcode\b|\bprogramming\b|\bimplement").expect("valid regex")),
            ("review", Regex::new(r"(?i)\breview\b|\bcritique\b").expect("valid regex")),
            (
                "architecture",
                Regex::new(r"(?i)\barchitecture\b|\bdesign\b|\bsystem design\b").expect("valid regex"),
            ),
            ("docs", Regex::new(r"(?i)\bdocs?\b|\bdocumentation\b").expect("valid regex")),
            ("test", Regex::new(r"(?i)\btest(ing)?\b|\bqa\b").expect("valid regex")),
            (
                "reasoning",
                Regex::new(r"(?i)\breasoning\b|\banalysis\b|\bthink").expect("valid regex"),
            ),
        ]
    })
}

fn extract_role(descriptor: &str) -> String {
    if let Some(m) = role_keyword_headings().find(descriptor) {
        let line = m.as_str().trim_start_matches('#').trim();
        if !line.is_empty() {
            return line.to_string();
        }
    }
    "agent".to_string()
}

fn extract_capabilities(descriptor: &str) -> BTreeSet<String> {
    let mut caps = BTreeSet::new();
    for (name, pattern) in capability_patterns() {
        if pattern.is_match(descriptor) {
            caps.insert((*name).to_string());
        }
    }
    if caps.is_empty() {
        caps.insert("general".to_string());
    }
    caps
}

fn last_seen_of(state_log: &Path) -> Option<chrono::DateTime<chrono::Utc>> {
    let meta = std::fs::metadata(state_log).ok()?;
    let modified: SystemTime = meta.modified().ok()?;
    Some(chrono::DateTime::<chrono::Utc>::from(modified))
}

/// Scans a directory tree and tracks agent liveness across rescans.
///
/// Per §4.2: a scan is idempotent given the same directory contents, and
/// `status`/`current_task` for a still-present agent survive a rescan —
/// they are external knowledge, not re-derived from the filesystem.
pub struct AgentRegistry {
    agents_dir: PathBuf,
    agents: RwLock<BTreeMap<String, Agent>>,
}

impl AgentRegistry {
    pub fn new(agents_dir: impl Into<PathBuf>) -> Self {
        AgentRegistry {
            agents_dir: agents_dir.into(),
            agents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Rebuilds the map from the directory tree, preserving liveness for
    /// agents that are still present.
    pub fn scan(&self) -> Result<BTreeMap<String, Agent>, RegistryError> {
        let mut fresh = BTreeMap::new();

        if self.agents_dir.is_dir() {
            for entry in std::fs::read_dir(&self.agents_dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_dir() {
                    continue;
                }
                let dir = entry.path();
                let descriptor_path = dir.join(DESCRIPTOR_FILENAME);
                if !descriptor_path.is_file() {
                    continue;
                }
                let name = entry
                    .file_name()
                    .to_string_lossy()
                    .to_ascii_uppercase();
                let descriptor_raw = std::fs::read_to_string(&descriptor_path).unwrap_or_default();
                let role = extract_role(&descriptor_raw);
                let capabilities = extract_capabilities(&descriptor_raw);
                let bridge_type = BridgeKind::from_agent_name(&name);
                let last_seen = last_seen_of(&dir.join(STATE_LOG_FILENAME));

                let mut agent = Agent::new(name.clone(), role, bridge_type);
                agent.capabilities = capabilities;
                agent.last_seen = last_seen;
                agent.descriptor_raw = descriptor_raw;
                fresh.insert(name, agent);
            }
        }

        let mut agents = self.agents.write();
        for (name, new_agent) in fresh.iter_mut() {
            if let Some(existing) = agents.get(name) {
                new_agent.status = existing.status;
                new_agent.current_task = existing.current_task.clone();
            }
        }
        *agents = fresh.clone();
        Ok(fresh)
    }

    pub fn get_all(&self) -> Vec<Agent> {
        self.agents.read().values().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<Agent> {
        self.agents.read().get(name).cloned()
    }

    pub fn get_available(&self, capability: Option<&str>) -> Vec<Agent> {
        self.agents
            .read()
            .values()
            .filter(|a| a.is_available_for(capability))
            .cloned()
            .collect()
    }

    pub fn update_status(&self, name: &str, status: AgentStatus, task: Option<String>) -> bool {
        let mut agents = self.agents.write();
        if let Some(agent) = agents.get_mut(name) {
            agent.status = status;
            agent.current_task = task;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_agent(dir: &Path, name: &str, descriptor: &str) {
        let agent_dir = dir.join(name);
        fs::create_dir_all(&agent_dir).unwrap();
        fs::write(agent_dir.join(DESCRIPTOR_FILENAME), descriptor).unwrap();
    }

    #[test]
    fn scan_discovers_agent_directories_with_descriptor() {
        let dir = tempdir().unwrap();
        write_agent(dir.path(), "claude_lustro", "# Engineer\n\nHandles code review and docs.");

        let registry = AgentRegistry::new(dir.path());
        let found = registry.scan().unwrap();

        assert_eq!(found.len(), 1);
        let agent = &found["CLAUDE_LUSTRO"];
        assert_eq!(agent.bridge_type, BridgeKind::Claude);
        assert!(agent.capabilities.contains("code"));
        assert!(agent.capabilities.contains("review"));
        assert!(agent.capabilities.contains("docs"));
    }

    #[test]
    fn directories_without_descriptor_are_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("NOT_AN_AGENT")).unwrap();

        let registry = AgentRegistry::new(dir.path());
        let found = registry.scan().unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn no_matching_capability_defaults_to_general() {
        let dir = tempdir().unwrap();
        write_agent(dir.path(), "shad", "# Human\n\nNo particular skill keywords here.");

        let registry = AgentRegistry::new(dir.path());
        let found = registry.scan().unwrap();
        assert_eq!(found["SHAD"].capabilities, BTreeSet::from(["general".to_string()]));
        assert_eq!(found["SHAD"].bridge_type, BridgeKind::Human);
    }

    #[test]
    fn rescans_preserve_liveness_and_current_task() {
        let dir = tempdir().unwrap();
        write_agent(dir.path(), "ollama_worker", "# Builder\n\ncode tasks");

        let registry = AgentRegistry::new(dir.path());
        registry.scan().unwrap();
        registry.update_status("OLLAMA_WORKER", AgentStatus::Active, Some("t1".to_string()));

        let rescanned = registry.scan().unwrap();
        assert_eq!(rescanned["OLLAMA_WORKER"].status, AgentStatus::Active);
        assert_eq!(rescanned["OLLAMA_WORKER"].current_task.as_deref(), Some("t1"));
    }

    #[test]
    fn get_available_excludes_offline_human_and_occupied() {
        let dir = tempdir().unwrap();
        write_agent(dir.path(), "ollama_worker", "# Builder\n\ncode tasks");
        write_agent(dir.path(), "shad", "# Human\n\nmisc");

        let registry = AgentRegistry::new(dir.path());
        registry.scan().unwrap();
        registry.update_status("OLLAMA_WORKER", AgentStatus::Active, None);

        let available = registry.get_available(None);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "OLLAMA_WORKER");
    }
}
