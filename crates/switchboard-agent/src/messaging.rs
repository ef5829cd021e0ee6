// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Messaging accessor: send, broadcast, read-then-acknowledge, clear
//!
//! Reads are at-least-once. The fetch and the acknowledgment are separate
//! round trips and the acknowledgment only ever carries ids the fetch
//! returned; if it fails the messages simply come back on a later read.

use crate::core::error::{AgentError, Result};
use crate::core::{BrokerClient, Identity};
use crate::models::{
    AckStatus, BroadcastReceipt, ClearReceipt, Inbox, MessageKind, MessagePage, ReadOptions,
    SendReceipt,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Largest page the broker serves
pub const MAX_READ_LIMIT: u32 = 50;
pub const DEFAULT_READ_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct Messenger {
    client: BrokerClient,
    identity: Arc<Identity>,
}

impl Messenger {
    pub fn new(client: BrokerClient, identity: Arc<Identity>) -> Self {
        Self { client, identity }
    }

    /// Send a message to one agent. Returns the broker-assigned message id.
    pub async fn send(&self, to: &str, content: &str, kind: MessageKind) -> Result<String> {
        let body = json!({
            "from": self.identity.agent_id(),
            "to": to,
            "content": content,
            "type": kind,
        });

        let receipt: SendReceipt = self.client.post("/messages/send", Some(body)).await?;
        debug!("[MESSAGING] Sent {} message {} to {}", kind, receipt.message_id, to);
        Ok(receipt.message_id)
    }

    /// Send a message to every other registered agent. Returns the recipient count.
    pub async fn broadcast(&self, content: &str, kind: MessageKind) -> Result<u64> {
        let body = json!({
            "from": self.identity.agent_id(),
            "content": content,
            "type": kind,
        });

        let receipt: BroadcastReceipt = self.client.post("/messages/broadcast", Some(body)).await?;
        if receipt.sent_to == 0 {
            info!("[MESSAGING] Broadcast delivered to no one (no other agents registered)");
        } else {
            debug!("[MESSAGING] Broadcast delivered to {} agent(s)", receipt.sent_to);
        }
        Ok(receipt.sent_to)
    }

    /// Fetch one page of this agent's inbox and acknowledge exactly what was fetched.
    ///
    /// # Errors
    /// `InvalidArgument` for a zero limit (no request is made); any broker
    /// error from the fetch. An acknowledgment failure is not an error: it is
    /// reported through [`Inbox::ack`].
    pub async fn read(&self, options: ReadOptions) -> Result<Inbox> {
        if options.limit == 0 {
            return Err(AgentError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        let limit = options.limit.min(MAX_READ_LIMIT);
        let agent_id = self.identity.agent_id();

        let path = format!(
            "/messages/{}?unread={}&limit={}",
            agent_id, options.unread_only, limit
        );
        let page: MessagePage = self.client.get(&path).await?;

        let MessagePage {
            mut messages,
            mut has_more,
        } = page;
        let limit = limit as usize;
        if messages.len() > limit {
            // Broker ignored the limit; keep the rest unread for the next page
            messages.truncate(limit);
            has_more = true;
        }

        if messages.is_empty() {
            return Ok(Inbox {
                messages,
                has_more,
                ack: AckStatus::NotNeeded,
            });
        }

        let ids: Vec<String> = messages.iter().map(|m| m.id.clone()).collect();
        let ack_path = format!("/messages/{}/ack", agent_id);
        let ack = match self
            .client
            .post::<Value>(&ack_path, Some(json!({ "ids": ids })))
            .await
        {
            Ok(_) => AckStatus::Acknowledged(ids.len()),
            Err(e) => {
                warn!(
                    "[MESSAGING] ⚠ Could not acknowledge {} message(s), they stay unread: {}",
                    ids.len(),
                    e
                );
                AckStatus::Failed(e.to_string())
            }
        };

        Ok(Inbox {
            messages,
            has_more,
            ack,
        })
    }

    /// Delete every message (read and unread) addressed to this agent.
    pub async fn clear(&self) -> Result<u64> {
        let path = format!("/messages/{}", self.identity.agent_id());
        let receipt: ClearReceipt = self.client.delete(&path).await?;
        debug!("[MESSAGING] Cleared {} message(s)", receipt.cleared);
        Ok(receipt.cleared)
    }
}
