// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Switchboard agent client
//!
//! Keeps one agent present in a shared multi-agent workspace coordinated by
//! a central broker, and exposes point-to-point messaging, broadcast and
//! shared key/value context on top of it.
//!
//! # Quick Start
//!
//! ```ignore
//! use switchboard_agent::{AgentNode, MessageKind, ReadOptions, WorkspaceService};
//!
//! let config = switchboard_config::load_config(None, None)?;
//! let node = AgentNode::start(&config).await?;
//!
//! node.send_message("frontend", "schema is ready", MessageKind::Schema).await?;
//! let inbox = node.read_messages(ReadOptions::default()).await?;
//!
//! node.shutdown().await;
//! ```
//!
//! # Architecture
//!
//! - **Transport** (`core::client`): one HTTP call per operation with a hard
//!   timeout; every failure becomes a [`BrokerError`].
//! - **Identity** (`core::identity`): computed once, shared read-only.
//! - **Registration** / **Presence**: register at startup, heartbeat on a
//!   fixed interval, re-register when the broker has forgotten the agent.
//! - **Messaging** / **Context** / **Directory**: on-demand accessors.
//! - **Shutdown**: one-shot teardown (stop heartbeats, mark offline, deregister).

pub mod context;
pub mod core;
pub mod directory;
pub mod messaging;
pub mod models;
pub mod node;
pub mod presence;
pub mod registration;
pub mod service;
pub mod shutdown;

pub use crate::core::{
    normalize_agent_id, AgentError, BrokerClient, BrokerEndpoint, BrokerError, Identity, Result,
};
pub use context::ContextStore;
pub use directory::Directory;
pub use messaging::{Messenger, DEFAULT_READ_LIMIT, MAX_READ_LIMIT};
pub use models::*;
pub use node::AgentNode;
pub use presence::{PresenceLoop, PresenceState, TickOutcome};
pub use registration::Registrar;
pub use service::WorkspaceService;
pub use shutdown::ShutdownCoordinator;
