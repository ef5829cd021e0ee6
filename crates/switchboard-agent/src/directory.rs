// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Read-only views of the broker's agent registry

use crate::core::error::Result;
use crate::core::BrokerClient;
use crate::models::{AgentListing, AgentSummary, BrokerStatus};

#[derive(Debug, Clone)]
pub struct Directory {
    client: BrokerClient,
}

impl Directory {
    pub fn new(client: BrokerClient) -> Self {
        Self { client }
    }

    /// Agents currently registered at the broker
    pub async fn list_agents(&self) -> Result<Vec<AgentSummary>> {
        let listing: AgentListing = self.client.get("/agents").await?;
        Ok(listing.agents)
    }

    /// Broker uptime, totals and per-agent unread counts
    pub async fn status(&self) -> Result<BrokerStatus> {
        Ok(self.client.get("/status").await?)
    }
}
