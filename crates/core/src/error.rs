// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared error type for every fallible orchestrator operation.

use thiserror::Error;

/// The machine-readable error kinds surfaced across the whole system: task
/// lifecycle, dispatch, bridges, and persistence all fail through this type.
#[derive(Debug, Error)]
pub enum OrchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("would cycle: {0}")]
    WouldCycle(String),

    #[error("busy: {0}")]
    Busy(String),

    #[error("bridge unavailable: {0}")]
    BridgeUnavailable(String),

    #[error("bridge timeout: {0}")]
    BridgeTimeout(String),

    #[error("bridge protocol error: {0}")]
    BridgeProtocol(String),

    #[error("persistence error: {0}")]
    Persist(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl OrchError {
    /// The machine-readable kind name, used in API error detail strings
    /// (`"{kind}: {detail}"`) and in task `error` fields.
    pub fn kind(&self) -> &'static str {
        match self {
            OrchError::NotFound(_) => "NotFound",
            OrchError::InvalidTransition(_) => "InvalidTransition",
            OrchError::WouldCycle(_) => "WouldCycle",
            OrchError::Busy(_) => "Busy",
            OrchError::BridgeUnavailable(_) => "BridgeUnavailable",
            OrchError::BridgeTimeout(_) => "BridgeTimeout",
            OrchError::BridgeProtocol(_) => "BridgeProtocol",
            OrchError::Persist(_) => "Persist",
            OrchError::Validation(_) => "Validation",
        }
    }

    /// `detail` text, as carried in a task's `error` field: `"{kind}: {detail}"`.
    pub fn as_detail(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

pub type Result<T> = std::result::Result<T, OrchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_error_families() {
        assert_eq!(OrchError::NotFound("x".into()).kind(), "NotFound");
        assert_eq!(OrchError::WouldCycle("x".into()).kind(), "WouldCycle");
    }

    #[test]
    fn detail_prefixes_with_kind() {
        let e = OrchError::Busy("no agent".into());
        assert!(e.as_detail().starts_with("Busy: "));
    }
}
