// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `switchboard.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    pub broker: BrokerConfig,
    pub agent: AgentConfig,
    pub presence: PresenceConfig,
    pub logging: LoggingConfig,
}

/// Where the coordination broker lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Base URL (http or https); trailing slashes are stripped by the agent
    pub url: String,
    /// Timeout for ordinary broker calls
    pub request_timeout_ms: u64,
    /// Timeout for the deregistration call issued while shutting down
    pub shutdown_timeout_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4800".to_string(),
            request_timeout_ms: 5000,
            shutdown_timeout_ms: 3000,
        }
    }
}

/// Raw identity inputs. Normalization happens in the agent crate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    pub id: Option<String>,
    pub name: Option<String>,
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub heartbeat_interval_ms: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: 30_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// "text" or "json"
    pub format: String,
    /// Optional directory for per-run log files
    pub directory: Option<PathBuf>,
    /// Number of run folders kept under `directory`
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            directory: None,
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SwitchboardConfig = toml::from_str(
            r#"
            [agent]
            id = "frontend"

            [presence]
            heartbeat_interval_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.id.as_deref(), Some("frontend"));
        assert_eq!(config.presence.heartbeat_interval_ms, 1000);
        assert_eq!(config.broker, BrokerConfig::default());
        assert_eq!(config.logging.level, "info");
    }
}
