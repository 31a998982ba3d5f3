// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-round, multi-agent deliberation session state.

use crate::id::{new_short_id, DebateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for DebateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DebateStatus::Pending => "pending",
            DebateStatus::Running => "running",
            DebateStatus::Completed => "completed",
            DebateStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// One agent's analysis-round contribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    pub agent: String,
    pub assessment: String,
    pub proposals: Vec<Proposal>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub text: String,
    pub priority: String,
    pub effort: String,
}

/// One agent's rebuttal-round contribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rebuttal {
    pub agent: String,
    /// "support" | "challenge" | "improve"
    pub stance: String,
    pub text: String,
    pub error: Option<String>,
}

/// One agent's vote-round contribution: votes cast for each *other* agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteBallot {
    pub agent: String,
    pub votes: BTreeMap<String, u8>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub agent: String,
    pub excerpt: String,
    pub total_votes: u32,
}

/// The full per-topic record: analyses, rebuttals, votes, consensus,
/// and the derived action items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicResult {
    pub topic: String,
    pub analyses: Vec<Analysis>,
    pub rebuttals: Vec<Rebuttal>,
    pub votes: Vec<VoteBallot>,
    pub consensus: Vec<ActionItem>,
}

/// A multi-round, multi-agent deliberation spanning one or more topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    pub id: DebateId,
    pub topics: Vec<String>,
    pub results: Vec<TopicResult>,
    pub status: DebateStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl DebateSession {
    pub fn new(topics: Vec<String>) -> Self {
        DebateSession {
            id: DebateId::new(new_short_id()),
            topics,
            results: Vec::new(),
            status: DebateStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = DebateStatus::Running;
    }

    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.status = DebateStatus::Completed;
        self.completed_at = Some(now);
    }

    pub fn mark_failed(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.status = DebateStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(now);
    }

    /// Renders the session as a full markdown report, per §4.7.
    pub fn to_markdown_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Debate Report: {}\n\n", self.id));
        out.push_str(&format!("Status: {}\n\n", self.status));
        for topic in &self.results {
            out.push_str(&format!("## Topic: {}\n\n", topic.topic));
            out.push_str("### Analyses\n\n");
            for a in &topic.analyses {
                out.push_str(&format!("- **{}**: {}\n", a.agent, a.assessment));
            }
            out.push_str("\n### Rebuttals\n\n");
            for r in &topic.rebuttals {
                out.push_str(&format!("- **{}** ({}): {}\n", r.agent, r.stance, r.text));
            }
            out.push_str("\n### Consensus\n\n");
            for item in &topic.consensus {
                out.push_str(&format!(
                    "- **{}** ({} votes): {}\n",
                    item.agent, item.total_votes, item.excerpt
                ));
            }
            out.push('\n');
        }
        out.push_str("## Closing Summary\n\n");
        out.push_str(&format!(
            "{} topic(s) deliberated across {} participant round(s).\n",
            self.topics.len(),
            self.results.iter().map(|t| t.analyses.len()).sum::<usize>()
        ));
        out
    }
}

/// Clamp a raw parsed vote score into the legal `[1, 5]` range.
pub fn clamp_vote(score: i64) -> u8 {
    score.clamp(1, 5) as u8
}
