// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Operation surface exposed to the external tool layer
//!
//! One method per accessor operation. Whatever invokes these (a tool
//! protocol server, a CLI, a test) adapts to this trait; nothing here knows
//! about schemas or output formatting.

use crate::core::error::Result;
use crate::core::Identity;
use crate::models::{
    AgentSummary, BrokerStatus, ContextEntry, ContextSummary, Inbox, MessageKind, ReadOptions,
};
use async_trait::async_trait;

#[async_trait]
pub trait WorkspaceService: Send + Sync {
    fn whoami(&self) -> &Identity;

    /// Returns the broker-assigned message id
    async fn send_message(&self, to: &str, content: &str, kind: MessageKind) -> Result<String>;

    /// Returns the number of recipients (zero is a success)
    async fn broadcast(&self, content: &str, kind: MessageKind) -> Result<u64>;

    async fn read_messages(&self, options: ReadOptions) -> Result<Inbox>;

    /// Returns the number of messages removed
    async fn clear_messages(&self) -> Result<u64>;

    async fn set_context(&self, key: &str, value: &str) -> Result<()>;

    async fn get_context(&self, key: &str) -> Result<ContextEntry>;

    async fn list_contexts(&self) -> Result<Vec<ContextSummary>>;

    async fn list_agents(&self) -> Result<Vec<AgentSummary>>;

    async fn broker_status(&self) -> Result<BrokerStatus>;
}
