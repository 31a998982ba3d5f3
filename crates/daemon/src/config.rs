// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-driven configuration, resolved once at startup.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// All knobs the daemon needs, collected in one place so `main` reads the
/// environment exactly once.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_host: IpAddr,
    pub bind_port: u16,
    pub inbox_dir: PathBuf,
    pub agents_dir: PathBuf,
    pub state_dir: PathBuf,
    pub ollama_url: String,
    pub ollama_timeout: Duration,
    pub default_model: String,
}

impl Config {
    /// Loads from environment variables, falling back to single-host
    /// defaults that require no setup.
    pub fn load() -> Self {
        Config {
            bind_host: env_parsed("RELAY_BIND_HOST").unwrap_or_else(|| IpAddr::from([127, 0, 0, 1])),
            bind_port: env_parsed("RELAY_BIND_PORT").unwrap_or(7878),
            inbox_dir: env_path("RELAY_INBOX_DIR").unwrap_or_else(|| PathBuf::from("./inbox")),
            agents_dir: env_path("RELAY_AGENTS_DIR").unwrap_or_else(|| PathBuf::from("./agents")),
            state_dir: env_path("RELAY_STATE_DIR").unwrap_or_else(|| PathBuf::from("./state")),
            ollama_url: std::env::var("RELAY_OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_timeout: env_parsed::<u64>("RELAY_OLLAMA_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(120)),
            default_model: std::env::var("RELAY_DEFAULT_MODEL").unwrap_or_else(|_| "llama3".to_string()),
        }
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.state_dir.join("tasks.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_require_no_environment() {
        for key in [
            "RELAY_BIND_HOST",
            "RELAY_BIND_PORT",
            "RELAY_INBOX_DIR",
            "RELAY_AGENTS_DIR",
            "RELAY_STATE_DIR",
            "RELAY_OLLAMA_URL",
            "RELAY_OLLAMA_TIMEOUT_SECS",
            "RELAY_DEFAULT_MODEL",
        ] {
            std::env::remove_var(key);
        }
        let config = Config::load();
        assert_eq!(config.bind_port, 7878);
        assert_eq!(config.default_model, "llama3");
    }

    #[test]
    #[serial]
    fn honors_overridden_port() {
        std::env::set_var("RELAY_BIND_PORT", "9999");
        let config = Config::load();
        assert_eq!(config.bind_port, 9999);
        std::env::remove_var("RELAY_BIND_PORT");
    }
}
