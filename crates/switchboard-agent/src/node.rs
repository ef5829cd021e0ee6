// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! A running agent: identity, presence and accessors wired together

use crate::context::ContextStore;
use crate::core::error::Result;
use crate::core::{BrokerClient, BrokerEndpoint, Identity};
use crate::directory::Directory;
use crate::messaging::Messenger;
use crate::models::{
    AgentSummary, BrokerStatus, ContextEntry, ContextSummary, Inbox, MessageKind, ReadOptions,
};
use crate::presence::{PresenceLoop, PresenceState};
use crate::registration::Registrar;
use crate::service::WorkspaceService;
use crate::shutdown::ShutdownCoordinator;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use switchboard_config::SwitchboardConfig;
use tokio::sync::watch;
use tracing::info;

/// Entry point for library users
///
/// `start` is the only place that can fail fatally (unusable broker URL).
/// Broker unavailability at startup is not fatal.
pub struct AgentNode {
    identity: Arc<Identity>,
    messenger: Messenger,
    context: ContextStore,
    directory: Directory,
    presence: watch::Receiver<PresenceState>,
    shutdown: Arc<ShutdownCoordinator>,
}

impl AgentNode {
    /// Validate the endpoint, compute the identity, register and start heartbeats.
    pub async fn start(config: &SwitchboardConfig) -> Result<Self> {
        let endpoint = BrokerEndpoint::parse(&config.broker.url)?;
        let identity = Arc::new(Identity::from_config(&config.agent));
        let client = BrokerClient::new(
            endpoint,
            Duration::from_millis(config.broker.request_timeout_ms),
        )?;

        info!(
            "[NODE] Starting agent {} ('{}', project '{}') against {}",
            identity.agent_id(),
            identity.name(),
            identity.project(),
            client.endpoint()
        );

        let registrar = Registrar::new(
            client.clone(),
            Arc::clone(&identity),
            Duration::from_millis(config.broker.shutdown_timeout_ms),
        );
        let mut presence = PresenceLoop::new(
            registrar.clone(),
            Duration::from_millis(config.presence.heartbeat_interval_ms),
        );
        presence.start().await?;
        let presence_rx = presence.subscribe();

        Ok(Self {
            messenger: Messenger::new(client.clone(), Arc::clone(&identity)),
            context: ContextStore::new(client.clone(), Arc::clone(&identity)),
            directory: Directory::new(client),
            presence: presence_rx,
            shutdown: Arc::new(ShutdownCoordinator::new(presence, registrar)),
            identity,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Advisory: the last register or heartbeat succeeded
    pub fn is_registered(&self) -> bool {
        *self.presence.borrow() == PresenceState::Registered
    }

    pub fn presence_state(&self) -> PresenceState {
        *self.presence.borrow()
    }

    /// Watch presence transitions
    pub fn presence_updates(&self) -> watch::Receiver<PresenceState> {
        self.presence.clone()
    }

    pub fn messenger(&self) -> &Messenger {
        &self.messenger
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Handle that can trigger teardown from another task
    pub fn shutdown_coordinator(&self) -> Arc<ShutdownCoordinator> {
        Arc::clone(&self.shutdown)
    }

    /// Stop heartbeats, mark offline, deregister. Runs at most once.
    pub async fn shutdown(&self) -> bool {
        self.shutdown.shutdown().await
    }

    pub async fn run_until_signal(&self) -> std::io::Result<()> {
        self.shutdown.run_until_signal().await
    }
}

#[async_trait]
impl WorkspaceService for AgentNode {
    fn whoami(&self) -> &Identity {
        &self.identity
    }

    async fn send_message(&self, to: &str, content: &str, kind: MessageKind) -> Result<String> {
        self.messenger.send(to, content, kind).await
    }

    async fn broadcast(&self, content: &str, kind: MessageKind) -> Result<u64> {
        self.messenger.broadcast(content, kind).await
    }

    async fn read_messages(&self, options: ReadOptions) -> Result<Inbox> {
        self.messenger.read(options).await
    }

    async fn clear_messages(&self) -> Result<u64> {
        self.messenger.clear().await
    }

    async fn set_context(&self, key: &str, value: &str) -> Result<()> {
        self.context.set(key, value).await
    }

    async fn get_context(&self, key: &str) -> Result<ContextEntry> {
        self.context.get(key).await
    }

    async fn list_contexts(&self) -> Result<Vec<ContextSummary>> {
        self.context.list().await
    }

    async fn list_agents(&self) -> Result<Vec<AgentSummary>> {
        self.directory.list_agents().await
    }

    async fn broker_status(&self) -> Result<BrokerStatus> {
        self.directory.status().await
    }
}
