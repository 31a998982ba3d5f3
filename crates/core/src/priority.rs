// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task priority: a small total order, lowest-first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Critical < High < Medium < Low`, matching declaration order so `derive(Ord)`
/// gives exactly the total order §3/§8 require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::OrchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(crate::error::OrchError::Validation(format!(
                "unknown priority: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_critical_first() {
        let mut v = vec![Priority::Low, Priority::Critical, Priority::Medium, Priority::High];
        v.sort();
        assert_eq!(
            v,
            vec![Priority::Critical, Priority::High, Priority::Medium, Priority::Low]
        );
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("CRITICAL".parse::<Priority>().unwrap(), Priority::Critical);
    }

    #[test]
    fn rejects_unknown() {
        assert!("urgent".parse::<Priority>().is_err());
    }
}
