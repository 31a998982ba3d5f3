// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-round, multi-agent deliberation built on the Ollama bridge.

use relay_adapters::OllamaBridge;
use relay_core::debate::clamp_vote;
use relay_core::{ActionItem, Agent, Analysis, DebateSession, Proposal, Rebuttal, TopicResult, VoteBallot};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Caps concurrent requests to the local inference endpoint within a round
/// (§9: "a small per-round concurrency cap, default 4").
const ROUND_CONCURRENCY_CAP: usize = 4;
const ANALYSIS_WORD_LIMIT: usize = 300;
const REBUTTAL_WORD_LIMIT: usize = 250;
const EXCERPT_CHARS: usize = 200;

/// Runs debate sessions entirely in memory, one topic at a time, agents in
/// parallel within a round (bounded by [`ROUND_CONCURRENCY_CAP`]).
pub struct DebateEngine {
    bridge: Arc<OllamaBridge>,
}

impl DebateEngine {
    pub fn new(bridge: Arc<OllamaBridge>) -> Self {
        DebateEngine { bridge }
    }

    /// A lightweight, informational system-context paragraph built once per
    /// session (not a capability — just framing for the agents).
    pub fn build_system_context(&self, participants: &[Agent]) -> String {
        let names: Vec<&str> = participants.iter().map(|a| a.name.as_str()).collect();
        format!(
            "A deliberation among {} agent(s): {}.",
            participants.len(),
            names.join(", ")
        )
    }

    /// Runs a full session: sequential across topics, parallel across
    /// agents within a round. Errors in any single agent call degrade
    /// gracefully — the failing agent contributes an error-tagged entry.
    pub async fn run(&self, mut session: DebateSession, participants: &[Agent]) -> DebateSession {
        session.mark_running();
        let system_context = self.build_system_context(participants);

        for topic in session.topics.clone() {
            let result = self.run_topic(&topic, participants, &system_context).await;
            session.results.push(result);
        }

        session.mark_completed(chrono::Utc::now());
        session
    }

    async fn run_topic(&self, topic: &str, participants: &[Agent], system_context: &str) -> TopicResult {
        let analyses = self.analysis_round(topic, participants, system_context).await;
        let rebuttals = self.rebuttal_round(topic, participants, &analyses).await;
        let votes = self.voting_round(participants, &analyses).await;
        let consensus = tally_consensus(&votes, &analyses);

        TopicResult {
            topic: topic.to_string(),
            analyses,
            rebuttals,
            votes,
            consensus,
        }
    }

    async fn analysis_round(&self, topic: &str, participants: &[Agent], system_context: &str) -> Vec<Analysis> {
        let semaphore = Arc::new(Semaphore::new(ROUND_CONCURRENCY_CAP));
        let mut handles = Vec::new();
        for agent in participants {
            let bridge = Arc::clone(&self.bridge);
            let sem = Arc::clone(&semaphore);
            let agent_name = agent.name.clone();
            let role = agent.role.clone();
            let topic = topic.to_string();
            let system_context = system_context.to_string();
            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire_owned().await;
                let prompt_task = relay_core::Task::new(
                    format!("Analyze: {topic}"),
                    format!(
                        "Context: {system_context}\nYour role: {role}\n\
                         Return JSON only, {ANALYSIS_WORD_LIMIT} words max, shaped as \
                         {{\"assessment\": \"...\", \"proposals\": [{{\"text\": \"...\", \
                         \"priority\": \"high|medium|low\", \"effort\": \"small|medium|large\"}}]}}, \
                         with up to three proposals."
                    ),
                    relay_core::Priority::Medium,
                );
                match bridge.execute(&prompt_task).await {
                    Ok(result) if result.success => {
                        let response = result.response.unwrap_or_default();
                        let (assessment, proposals) = parse_analysis(&response);
                        Analysis {
                            agent: agent_name,
                            assessment,
                            proposals,
                            error: None,
                        }
                    }
                    Ok(result) => Analysis {
                        agent: agent_name,
                        assessment: String::new(),
                        proposals: Vec::new(),
                        error: result.error,
                    },
                    Err(e) => Analysis {
                        agent: agent_name,
                        assessment: String::new(),
                        proposals: Vec::new(),
                        error: Some(e.to_string()),
                    },
                }
            }));
        }

        let mut analyses = Vec::new();
        for handle in handles {
            if let Ok(analysis) = handle.await {
                analyses.push(analysis);
            }
        }
        analyses
    }

    async fn rebuttal_round(&self, topic: &str, participants: &[Agent], analyses: &[Analysis]) -> Vec<Rebuttal> {
        let combined: String = analyses
            .iter()
            .map(|a| format!("- {}: {}", a.agent, a.assessment))
            .collect::<Vec<_>>()
            .join("\n");

        let semaphore = Arc::new(Semaphore::new(ROUND_CONCURRENCY_CAP));
        let mut handles = Vec::new();
        for agent in participants {
            let bridge = Arc::clone(&self.bridge);
            let sem = Arc::clone(&semaphore);
            let agent_name = agent.name.clone();
            let topic = topic.to_string();
            let combined = combined.clone();
            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire_owned().await;
                let prompt_task = relay_core::Task::new(
                    format!("Rebut: {topic}"),
                    format!(
                        "Other analyses:\n{combined}\n\nReturn JSON only, {REBUTTAL_WORD_LIMIT} words max, \
                         shaped as {{\"stance\": \"support|challenge|improve\", \"text\": \"...\"}}."
                    ),
                    relay_core::Priority::Medium,
                );
                match bridge.execute(&prompt_task).await {
                    Ok(result) if result.success => {
                        let response = result.response.unwrap_or_default();
                        let (stance, text) = parse_rebuttal(&response);
                        Rebuttal {
                            agent: agent_name,
                            stance,
                            text,
                            error: None,
                        }
                    }
                    Ok(result) => Rebuttal {
                        agent: agent_name,
                        stance: String::new(),
                        text: String::new(),
                        error: result.error,
                    },
                    Err(e) => Rebuttal {
                        agent: agent_name,
                        stance: String::new(),
                        text: String::new(),
                        error: Some(e.to_string()),
                    },
                }
            }));
        }

        let mut rebuttals = Vec::new();
        for handle in handles {
            if let Ok(rebuttal) = handle.await {
                rebuttals.push(rebuttal);
            }
        }
        rebuttals
    }

    async fn voting_round(&self, participants: &[Agent], analyses: &[Analysis]) -> Vec<VoteBallot> {
        let proposals: String = analyses
            .iter()
            .map(|a| format!("- {}: {}", a.agent, a.assessment))
            .collect::<Vec<_>>()
            .join("\n");

        let semaphore = Arc::new(Semaphore::new(ROUND_CONCURRENCY_CAP));
        let mut handles = Vec::new();
        for agent in participants {
            let bridge = Arc::clone(&self.bridge);
            let sem = Arc::clone(&semaphore);
            let agent_name = agent.name.clone();
            let proposals = proposals.clone();
            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire_owned().await;
                let prompt_task = relay_core::Task::new(
                    "Vote",
                    format!(
                        "Proposals:\n{proposals}\n\nScore every OTHER agent's proposal 1-5 as JSON: \
                         {{\"votes\": {{\"AGENT\": N, ...}}}}"
                    ),
                    relay_core::Priority::Medium,
                );
                let response = bridge.execute(&prompt_task).await;
                let votes = match &response {
                    Ok(result) if result.success => result
                        .response
                        .as_deref()
                        .and_then(parse_votes)
                        .unwrap_or_default(),
                    _ => BTreeMap::new(),
                };
                let error = match &response {
                    Ok(result) if !result.success => result.error.clone(),
                    Err(e) => Some(e.to_string()),
                    _ => None,
                };
                let mut votes = votes;
                votes.remove(&agent_name); // self-votes discarded
                VoteBallot {
                    agent: agent_name,
                    votes,
                    error,
                }
            }));
        }

        let mut ballots = Vec::new();
        for handle in handles {
            if let Ok(ballot) = handle.await {
                ballots.push(ballot);
            }
        }
        ballots
    }
}

/// Finds the first balanced-brace JSON object in `text` and parses it.
/// Agent responses routinely wrap JSON in prose ("here's my answer: {...}"),
/// so this scans for the object rather than requiring the whole response to
/// be valid JSON.
fn parse_first_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut depth = 0i32;
    let mut end = None;
    for (i, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + i + 1);
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end?;
    serde_json::from_str(&text[start..end]).ok()
}

/// Parses `{"votes": {"AGENT": N, ...}}`. Malformed input yields an empty
/// map; all scores are clamped to `[1, 5]`.
fn parse_votes(text: &str) -> Option<BTreeMap<String, u8>> {
    let value = parse_first_json_object(text)?;
    let votes = value.get("votes")?.as_object()?;
    let mut out = BTreeMap::new();
    for (agent, score) in votes {
        if let Some(n) = score.as_i64() {
            out.insert(agent.clone(), clamp_vote(n));
        }
    }
    Some(out)
}

/// Parses `{"assessment": "...", "proposals": [{"text", "priority", "effort"}, ...]}`.
/// Falls back to the raw response text as the assessment with no proposals
/// when the response isn't the requested JSON shape.
fn parse_analysis(text: &str) -> (String, Vec<Proposal>) {
    let Some(value) = parse_first_json_object(text) else {
        return (text.to_string(), Vec::new());
    };
    let assessment = value
        .get("assessment")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| text.to_string());
    let proposals = value
        .get("proposals")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(Proposal {
                        text: item.get("text")?.as_str()?.to_string(),
                        priority: item.get("priority").and_then(|v| v.as_str()).unwrap_or("medium").to_string(),
                        effort: item.get("effort").and_then(|v| v.as_str()).unwrap_or("medium").to_string(),
                    })
                })
                .take(3)
                .collect()
        })
        .unwrap_or_default();
    (assessment, proposals)
}

const VALID_STANCES: [&str; 3] = ["support", "challenge", "improve"];

/// Parses `{"stance": "support|challenge|improve", "text": "..."}`. Falls
/// back to `"support"` with the raw response text when the response isn't
/// the requested JSON shape or names an unrecognized stance.
fn parse_rebuttal(text: &str) -> (String, String) {
    let Some(value) = parse_first_json_object(text) else {
        return ("support".to_string(), text.to_string());
    };
    let stance = value
        .get("stance")
        .and_then(|v| v.as_str())
        .filter(|s| VALID_STANCES.contains(s))
        .unwrap_or("support")
        .to_string();
    let rebuttal_text = value
        .get("text")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| text.to_string());
    (stance, rebuttal_text)
}

/// Sums votes per agent, ranks descending, and builds action items for the
/// top 3 (agent name + short excerpt of their own analysis).
fn tally_consensus(ballots: &[VoteBallot], analyses: &[Analysis]) -> Vec<ActionItem> {
    let mut totals: BTreeMap<String, u32> = BTreeMap::new();
    for ballot in ballots {
        for (agent, score) in &ballot.votes {
            *totals.entry(agent.clone()).or_insert(0) += *score as u32;
        }
    }

    let mut ranked: Vec<(String, u32)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(3)
        .map(|(agent, total_votes)| {
            let excerpt = analyses
                .iter()
                .find(|a| a.agent == agent)
                .map(|a| a.assessment.chars().take(EXCERPT_CHARS).collect())
                .unwrap_or_default();
            ActionItem {
                agent,
                excerpt,
                total_votes,
            }
        })
        .collect()
}
