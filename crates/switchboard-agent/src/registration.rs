// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Registration lifecycle: register, advisory status, deregister

use crate::core::{BrokerClient, BrokerError, Identity};
use crate::models::RegisterResponse;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Owns the agent's registration against the broker
#[derive(Debug, Clone)]
pub struct Registrar {
    client: BrokerClient,
    identity: Arc<Identity>,
    shutdown_timeout: Duration,
}

impl Registrar {
    /// # Arguments
    /// * `client` - Transport client
    /// * `identity` - This node's identity
    /// * `shutdown_timeout` - Deadline for the deregistration call made during teardown
    pub fn new(client: BrokerClient, identity: Arc<Identity>, shutdown_timeout: Duration) -> Self {
        Self {
            client,
            identity,
            shutdown_timeout,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn client(&self) -> &BrokerClient {
        &self.client
    }

    /// Register (or refresh) this agent's record at the broker.
    pub async fn register(&self) -> Result<RegisterResponse, BrokerError> {
        let body = json!({
            "agentId": self.identity.agent_id(),
            "name": self.identity.name(),
            "project": self.identity.project(),
            "path": self.identity.working_path().to_string_lossy(),
        });

        let response: Option<RegisterResponse> =
            self.client.post("/agents/register", Some(body)).await?;
        let response = response.unwrap_or_default();

        match response.total_agents {
            Some(total) => info!(
                "[REGISTRATION] ✓ Registered as {} ({} agent(s) online)",
                self.identity.agent_id(),
                total
            ),
            None => info!("[REGISTRATION] ✓ Registered as {}", self.identity.agent_id()),
        }
        Ok(response)
    }

    /// Publish `<agentId>-status` to the shared context.
    ///
    /// Failures are logged and otherwise ignored. Returns whether the broker
    /// accepted the update.
    pub async fn set_status(&self, value: &str) -> bool {
        let body = json!({
            "key": self.identity.status_key(),
            "value": value,
            "setBy": self.identity.agent_id(),
        });

        match self.client.post::<Value>("/context", Some(body)).await {
            Ok(_) => {
                debug!("[REGISTRATION] Status set to '{}'", value);
                true
            }
            Err(e) => {
                warn!("[REGISTRATION] ⚠ Could not set status '{}': {}", value, e);
                false
            }
        }
    }

    /// Remove this agent's registration, bounded by the shutdown timeout.
    ///
    /// Any failure is swallowed; the broker may already be gone.
    pub async fn deregister(&self) -> bool {
        let path = format!("/agents/{}", self.identity.agent_id());
        match self
            .client
            .call_with_timeout::<Value>(Method::DELETE, &path, None, self.shutdown_timeout)
            .await
        {
            Ok(_) => {
                info!("[REGISTRATION] Deregistered {}", self.identity.agent_id());
                true
            }
            Err(e) => {
                warn!("[REGISTRATION] ⚠ Deregistration failed (ignored): {}", e);
                false
            }
        }
    }
}
