// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Transfer objects exchanged with the broker
//!
//! The broker owns messages, context entries and the agent registry; these
//! types only describe what crosses the wire. Every response field the
//! client does not strictly need is optional or defaulted so that a newer
//! broker adding fields never breaks decoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message category (`type` on the wire)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Code,
    Schema,
    Endpoint,
    Config,
}

impl MessageKind {
    pub const ALL: [MessageKind; 5] = [
        MessageKind::Text,
        MessageKind::Code,
        MessageKind::Schema,
        MessageKind::Endpoint,
        MessageKind::Config,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Code => "code",
            MessageKind::Schema => "schema",
            MessageKind::Endpoint => "endpoint",
            MessageKind::Config => "config",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| {
                format!("Unknown message type '{s}' (expected text, code, schema, endpoint or config)")
            })
    }
}

/// Timestamp as the broker reports it: epoch millis or an ISO-8601 string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrokerTimestamp {
    Millis(i64),
    Text(String),
}

impl fmt::Display for BrokerTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerTimestamp::Millis(ms) => write!(f, "{ms}"),
            BrokerTimestamp::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub timestamp: Option<BrokerTimestamp>,
}

/// One page of `GET /messages/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReceipt {
    pub sent_to: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClearReceipt {
    pub cleared: u64,
}

/// Parameters for reading the inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Only return messages not yet acknowledged
    pub unread_only: bool,
    /// Requested page size; clamped to the broker maximum, zero is rejected
    pub limit: u32,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            unread_only: true,
            limit: 20,
        }
    }
}

impl ReadOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn include_read(mut self) -> Self {
        self.unread_only = false;
        self
    }
}

/// Outcome of the acknowledgment round trip that follows a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckStatus {
    /// Nothing was fetched, so nothing was acknowledged
    NotNeeded,
    /// This many messages were marked read
    Acknowledged(usize),
    /// The acknowledgment call failed; the messages stay unread at the broker
    Failed(String),
}

impl AckStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, AckStatus::Failed(_))
    }
}

/// Messages returned by a read plus what happened to their acknowledgment
#[derive(Debug, Clone, PartialEq)]
pub struct Inbox {
    pub messages: Vec<Message>,
    pub has_more: bool,
    pub ack: AckStatus,
}

impl Inbox {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Shared key/value entry as returned by `GET /context/{key}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    #[serde(default)]
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub set_by: Option<String>,
    #[serde(default)]
    pub set_by_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<BrokerTimestamp>,
}

/// Entry of `GET /context` (no value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    pub key: String,
    #[serde(default)]
    pub set_by: Option<String>,
    #[serde(default)]
    pub timestamp: Option<BrokerTimestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ContextListing {
    #[serde(default)]
    pub contexts: Vec<ContextSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub agent_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub last_seen: Option<BrokerTimestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AgentListing {
    #[serde(default)]
    pub agents: Vec<AgentSummary>,
}

/// Per-agent line of `GET /status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub agent_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub last_seen: Option<BrokerTimestamp>,
    #[serde(default)]
    pub unread_messages: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerStatus {
    /// Broker uptime in seconds
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub total_agents: u64,
    #[serde(default)]
    pub total_context_keys: u64,
    #[serde(default)]
    pub agents: Vec<AgentStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub total_agents: Option<u64>,
}
