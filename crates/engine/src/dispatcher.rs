// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intent classification and routing decision.

use relay_adapters::{AgentRegistry, Bridge, OllamaBridge};
use relay_core::{Agent, BridgeKind, RoutingRule, RoutingTable};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;

pub const FALLBACK_TYPE: &str = "code_simple";
const LLM_SECOND_OPINION_TIMEOUT: Duration = Duration::from_secs(10);
const LLM_SECOND_OPINION_MIN_LEN: usize = 20;

fn intent_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                "code_complex",
                Regex::new(r"(?i)\brefactor\b|\bmulti-?file\b|\bmigrat(e|ion)\b|\barchitectur").unwrap(),
            ),
            ("review", Regex::new(r"(?i)\breview\b|\bcritique\b|\bpull request\b|\bpr\b").unwrap()),
            (
                "architecture",
                Regex::new(r"(?i)\barchitecture\b|\bsystem design\b|\bdesign the\b").unwrap(),
            ),
            ("docs", Regex::new(r"(?i)\bdocument(ation)?\b|\breadme\b|\bdocstring").unwrap()),
            ("test", Regex::new(r"(?i)\btest(s|ing)?\b|\bunit test\b|\bcoverage\b").unwrap()),
            (
                "reasoning",
                Regex::new(r"(?i)\banalyze\b|\banalysis\b|\bwhy\b|\bexplain\b|\btrade-?off").unwrap(),
            ),
            (
                "quick",
                Regex::new(r"(?i)^(what|who|when|where|is|are|does|do)\b").unwrap(),
            ),
            ("code_simple", Regex::new(r"(?i)\bfunction\b|\bimplement\b|\bwrite a\b|\bfix\b|\bbug\b").unwrap()),
        ]
    })
}

/// Result of `classify`: the winning type, its match count, and whether the
/// fallback was used.
#[derive(Debug, Clone)]
pub struct Classification {
    pub task_type: String,
    pub match_count: usize,
    pub fallback: bool,
}

/// Scans the fixed ordered pattern list against `"{title} {description}"`;
/// highest match count wins, ties go to the first-declared pattern. No
/// match at all falls back to [`FALLBACK_TYPE`].
pub fn classify(title: &str, description: &str) -> Classification {
    let haystack = format!("{title} {description}");
    let mut best: Option<(&str, usize)> = None;
    for (task_type, pattern) in intent_patterns() {
        let count = pattern.find_iter(&haystack).count();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((task_type, count)),
        }
    }

    match best {
        Some((task_type, count)) => Classification {
            task_type: task_type.to_string(),
            match_count: count,
            fallback: false,
        },
        None => Classification {
            task_type: FALLBACK_TYPE.to_string(),
            match_count: 0,
            fallback: true,
        },
    }
}

/// 1.0 if the winning type has >= 3 matches, 0.7 for 1-2 matches, 0.5 if the
/// fallback was used with zero matches.
pub fn confidence_for(classification: &Classification) -> f32 {
    if classification.fallback {
        0.5
    } else if classification.match_count >= 3 {
        1.0
    } else {
        0.7
    }
}

/// Whether the async LLM second opinion should be consulted: only when the
/// keyword classifier fell back, and the input is long enough to be
/// ambiguous rather than just short.
pub fn needs_second_opinion(classification: &Classification, title: &str, description: &str) -> bool {
    classification.fallback && (title.len() + description.len()) > LLM_SECOND_OPINION_MIN_LEN
}

/// Asks the Ollama bridge to name the task type directly; scans the
/// response for the first known type name. Any error or timeout degrades
/// silently to the keyword result (never fails a dispatch).
pub async fn classify_with_llm(
    bridge: &OllamaBridge,
    title: &str,
    description: &str,
    known_types: &[&str],
    keyword_result: &Classification,
) -> Classification {
    let prompt_task = relay_core::Task::new(
        title,
        format!(
            "{description}\n\nRespond with exactly one of these task types: {}",
            known_types.join(", ")
        ),
        relay_core::Priority::Low,
    );

    let call = tokio::time::timeout(LLM_SECOND_OPINION_TIMEOUT, bridge.execute(&prompt_task));
    match call.await {
        Ok(Ok(result)) if result.success => {
            if let Some(response) = result.response {
                for t in known_types {
                    if response.to_ascii_lowercase().contains(&t.to_ascii_lowercase()) {
                        return Classification {
                            task_type: (*t).to_string(),
                            match_count: keyword_result.match_count,
                            fallback: false,
                        };
                    }
                }
            }
            keyword_result.clone()
        }
        _ => keyword_result.clone(),
    }
}

/// The output of a full dispatch decision.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingDecision {
    pub task_type: String,
    pub agent: String,
    pub bridge: BridgeKind,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub busy: bool,
}

/// The universal fallback agent name, matching the original system's
/// `OLLAMA_WORKER` convention.
pub const UNIVERSAL_FALLBACK_AGENT: &str = "OLLAMA_WORKER";

/// Looks up a task type in the routing table, checks live availability via
/// the registry (if wired in), and falls back to the universal ollama
/// worker when the primary agent is unavailable. The API may override
/// `{agent, bridge, model}` on a per-call basis via `overrides`.
pub struct Dispatcher {
    routing_table: RoutingTable,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchOverrides {
    pub agent: Option<String>,
    pub bridge: Option<BridgeKind>,
    pub model: Option<String>,
}

impl Dispatcher {
    pub fn new(routing_table: RoutingTable) -> Self {
        Dispatcher { routing_table }
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    fn rule_for(&self, task_type: &str) -> RoutingRule {
        self.routing_table
            .get(task_type)
            .cloned()
            .unwrap_or_else(|| self.routing_table.get(FALLBACK_TYPE).cloned().unwrap_or_else(|| {
                RoutingRule::new(UNIVERSAL_FALLBACK_AGENT, BridgeKind::Ollama)
            }))
    }

    /// Is the named agent free to take work? `None` registry means "assume
    /// yes" (no liveness wired in, e.g. the static `/routing` view).
    fn check_availability(registry: Option<&AgentRegistry>, agent_name: &str) -> bool {
        match registry {
            None => true,
            Some(reg) => match reg.get(agent_name) {
                None => false,
                Some(agent) => agent.status != relay_core::AgentStatus::Offline && agent.current_task.is_none(),
            },
        }
    }

    fn find_alternative(registry: &AgentRegistry) -> Option<Agent> {
        let fallback = registry.get(UNIVERSAL_FALLBACK_AGENT)?;
        if fallback.status != relay_core::AgentStatus::Offline && fallback.current_task.is_none() {
            Some(fallback)
        } else {
            None
        }
    }

    /// Full orchestration: classify, look up the route, check availability,
    /// and build the decision record. `title`/`description` drive the
    /// keyword classifier; `registry` is `None` for the static `/routing`
    /// view and `Some` for a live dispatch.
    pub fn dispatch(
        &self,
        title: &str,
        description: &str,
        registry: Option<&AgentRegistry>,
        overrides: DispatchOverrides,
    ) -> RoutingDecision {
        let classification = classify(title, description);
        let confidence = confidence_for(&classification);
        let rule = self.rule_for(&classification.task_type);

        let mut agent = overrides.agent.clone().unwrap_or_else(|| rule.agent_name.clone());
        let mut bridge = overrides.bridge.unwrap_or(rule.bridge);
        let model = overrides.model.clone().or_else(|| rule.model.clone());
        let mut fallback_used = false;
        let mut busy = false;

        if let Some(reg) = registry {
            if !Self::check_availability(Some(reg), &agent) {
                match Self::find_alternative(reg) {
                    Some(alt) => {
                        agent = alt.name.clone();
                        bridge = alt.bridge_type;
                        fallback_used = true;
                    }
                    None => {
                        busy = true;
                    }
                }
            }
        }

        RoutingDecision {
            task_type: classification.task_type,
            agent,
            bridge,
            confidence,
            model,
            temperature: rule.temperature,
            system_prompt: rule.system_prompt.clone(),
            fallback: fallback_used,
            busy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fibonacci_prompt_as_code_simple() {
        let c = classify("write a fibonacci function", "in python");
        assert_eq!(c.task_type, "code_simple");
    }

    #[test]
    fn classifies_refactor_prompt_as_code_complex() {
        let c = classify("refactor the auth layer for security", "across several files");
        assert_eq!(c.task_type, "code_complex");
    }

    #[test]
    fn no_match_falls_back() {
        let c = classify("zzz qqq", "xxx");
        assert!(c.fallback);
        assert_eq!(c.task_type, FALLBACK_TYPE);
    }

    #[test]
    fn confidence_scales_with_match_count() {
        let fallback = Classification {
            task_type: FALLBACK_TYPE.to_string(),
            match_count: 0,
            fallback: true,
        };
        assert_eq!(confidence_for(&fallback), 0.5);

        let weak = Classification {
            task_type: "docs".to_string(),
            match_count: 1,
            fallback: false,
        };
        assert_eq!(confidence_for(&weak), 0.7);

        let strong = Classification {
            task_type: "docs".to_string(),
            match_count: 3,
            fallback: false,
        };
        assert_eq!(confidence_for(&strong), 1.0);
    }

    #[test]
    fn second_opinion_only_for_long_fallback_inputs() {
        let fallback = Classification {
            task_type: FALLBACK_TYPE.to_string(),
            match_count: 0,
            fallback: true,
        };
        assert!(!needs_second_opinion(&fallback, "hi", "there"));
        assert!(needs_second_opinion(
            &fallback,
            "a long enough prompt to trigger it",
            "more context words here too"
        ));
    }

    #[test]
    fn dispatch_without_registry_returns_static_route() {
        let table = RoutingTable::default_table("llama3");
        let dispatcher = Dispatcher::new(table);
        let decision = dispatcher.dispatch("write a fibonacci function", "in python", None, DispatchOverrides::default());
        assert_eq!(decision.task_type, "code_simple");
        assert!(!decision.busy);
    }

    #[test]
    fn classifier_is_deterministic() {
        let a = classify("review this pull request", "please critique");
        let b = classify("review this pull request", "please critique");
        assert_eq!(a.task_type, b.task_type);
        assert_eq!(a.match_count, b.match_count);
    }

    #[test]
    fn busy_primary_falls_back_to_ollama_worker() {
        let dir = tempfile::tempdir().unwrap();
        for (name, descriptor) in [
            ("claude_lustro", "# Engineer\n\ncomplex multi-file code work"),
            ("ollama_worker", "# Builder\n\ncode tasks"),
        ] {
            let agent_dir = dir.path().join(name);
            std::fs::create_dir_all(&agent_dir).unwrap();
            std::fs::write(agent_dir.join("WHO_AM_I.md"), descriptor).unwrap();
        }
        let registry = AgentRegistry::new(dir.path());
        registry.scan().unwrap();
        registry.update_status("CLAUDE_LUSTRO", relay_core::AgentStatus::Active, Some("other-task".to_string()));
        registry.update_status("OLLAMA_WORKER", relay_core::AgentStatus::Idle, None);

        let table = RoutingTable::default_table("llama3");
        let dispatcher = Dispatcher::new(table);
        let decision = dispatcher.dispatch(
            "refactor the whole module",
            "multi file change",
            Some(&registry),
            DispatchOverrides::default(),
        );

        assert_eq!(decision.task_type, "code_complex");
        assert!(decision.fallback);
        assert_eq!(decision.agent, UNIVERSAL_FALLBACK_AGENT);
        assert_eq!(decision.bridge, BridgeKind::Ollama);
    }

    #[test]
    fn busy_primary_with_no_fallback_available_reports_busy() {
        let dir = tempfile::tempdir().unwrap();
        let agent_dir = dir.path().join("claude_lustro");
        std::fs::create_dir_all(&agent_dir).unwrap();
        std::fs::write(agent_dir.join("WHO_AM_I.md"), "# Engineer\n\ncomplex code work").unwrap();

        let registry = AgentRegistry::new(dir.path());
        registry.scan().unwrap();
        registry.update_status("CLAUDE_LUSTRO", relay_core::AgentStatus::Active, Some("other-task".to_string()));

        let table = RoutingTable::default_table("llama3");
        let dispatcher = Dispatcher::new(table);
        let decision = dispatcher.dispatch(
            "refactor the whole module",
            "multi file change",
            Some(&registry),
            DispatchOverrides::default(),
        );

        assert!(decision.busy);
        assert!(!decision.fallback);
    }
}
