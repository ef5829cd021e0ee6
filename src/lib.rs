// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! # Switchboard
//!
//! Presence and messaging client for one agent in a shared multi-agent
//! workspace. A central broker keeps the registry of agents, their
//! messages and a shared key/value context; each node registers itself,
//! keeps itself alive with heartbeats and talks to the others through the
//! broker.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! switchboard = "0.1"
//! ```
//!
//! ```rust,no_run
//! use switchboard::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None, None)?;
//! let node = AgentNode::start(&config).await?;
//!
//! node.set_context("api-schema", r#"{"users":"GET /users"}"#).await?;
//! node.broadcast("schema published", MessageKind::Schema).await?;
//!
//! let inbox = node.read_messages(ReadOptions::default()).await?;
//! for message in &inbox.messages {
//!     println!("{}: {}", message.from, message.content);
//! }
//!
//! node.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: switchboard-config, -observability         │
//! │  (TOML + env + CLI config, tracing setup)               │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Agent: switchboard-agent                               │
//! │  (transport, identity, presence, messaging, context)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Process: switchboard-node                              │
//! │  (start, wait for SIGTERM/SIGINT, tear down)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use switchboard_agent as agent;
pub use switchboard_config as config;
pub use switchboard_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::agent::{
        AckStatus, AgentError, AgentNode, BrokerError, Identity, Inbox, Message, MessageKind,
        PresenceState, ReadOptions, WorkspaceService,
    };
    pub use crate::config::{load_config, SwitchboardConfig};
}

/// Translate the file/env logging section into the subscriber's settings.
pub fn logging_settings(
    config: &config::LoggingConfig,
) -> observability::LoggingConfig {
    observability::LoggingConfig {
        level: config.level.clone(),
        format: observability::LogFormat::from_name(&config.format),
        directory: config.directory.clone(),
        retention_runs: config.retention_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let config = SwitchboardConfig::default();
        assert_eq!(ReadOptions::default().limit, 20);
        assert_eq!(MessageKind::default().as_str(), "text");
        assert_eq!(config.presence.heartbeat_interval_ms, 30_000);
    }

    #[test]
    fn test_logging_settings_translation() {
        let mut logging = config::LoggingConfig::default();
        logging.format = "JSON".to_string();
        logging.level = "debug".to_string();

        let settings = logging_settings(&logging);
        assert_eq!(settings.format, observability::LogFormat::Json);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.retention_runs, logging.retention_runs);
    }
}
