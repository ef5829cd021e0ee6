// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Presence loop: periodic heartbeats with automatic re-registration
//!
//! The broker keeps its registry in memory. When it restarts it forgets
//! every agent and answers heartbeats with 404; the loop treats that (and
//! only that) as a signal to register again within the same tick. Every
//! other heartbeat failure is reported and left to the next tick.

use crate::core::error::{AgentError, BrokerError, Result};
use crate::registration::Registrar;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Local view of the registration. Advisory only; the broker is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    /// A register call is in flight
    Registering,
    Registered,
    /// The last register attempt failed or the broker reported the agent unknown
    UnknownToBroker,
    /// Heartbeats were cancelled by shutdown
    Stopped,
}

/// What a single heartbeat tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Heartbeat accepted
    Acknowledged,
    /// Broker had forgotten us; re-registration succeeded
    Recovered,
    /// Broker had forgotten us; re-registration failed too
    RecoveryFailed(BrokerError),
    /// Heartbeat failed for another reason; no recovery attempted
    Failed(BrokerError),
}

struct PresenceCore {
    registrar: Registrar,
    state: watch::Sender<PresenceState>,
    /// Held for a whole tick; scheduled and manual ticks never overlap
    tick_lock: Mutex<()>,
}

impl PresenceCore {
    fn set_state(&self, state: PresenceState) {
        self.state.send_replace(state);
    }

    async fn register(&self) -> std::result::Result<(), BrokerError> {
        self.set_state(PresenceState::Registering);
        match self.registrar.register().await {
            Ok(_) => {
                self.set_state(PresenceState::Registered);
                Ok(())
            }
            Err(e) => {
                self.set_state(PresenceState::UnknownToBroker);
                Err(e)
            }
        }
    }

    async fn tick(&self) -> TickOutcome {
        let _serialized = self.tick_lock.lock().await;
        let agent_id = self.registrar.identity().agent_id();
        let path = format!("/agents/{}/heartbeat", agent_id);

        match self.registrar.client().post::<Value>(&path, None).await {
            Ok(_) => {
                debug!("[PRESENCE] ✓ Heartbeat acknowledged for {}", agent_id);
                self.set_state(PresenceState::Registered);
                TickOutcome::Acknowledged
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    "[PRESENCE] ⚠ Broker no longer knows {} (restarted?), re-registering",
                    agent_id
                );
                self.set_state(PresenceState::UnknownToBroker);
                match self.register().await {
                    Ok(()) => {
                        info!("[PRESENCE] ✓ Re-registered {} after broker state loss", agent_id);
                        TickOutcome::Recovered
                    }
                    Err(register_err) => {
                        warn!(
                            "[PRESENCE] ⚠ Re-registration failed, retrying next tick: {}",
                            register_err
                        );
                        TickOutcome::RecoveryFailed(register_err)
                    }
                }
            }
            Err(e) => {
                warn!("[PRESENCE] ⚠ Heartbeat failed for {}: {}", agent_id, e);
                TickOutcome::Failed(e)
            }
        }
    }
}

/// Owns the single recurring heartbeat task
pub struct PresenceLoop {
    core: Arc<PresenceCore>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl PresenceLoop {
    /// # Arguments
    /// * `registrar` - Registration lifecycle used for the initial and recovery registers
    /// * `interval` - Fixed heartbeat period
    pub fn new(registrar: Registrar, interval: Duration) -> Self {
        let (state, _) = watch::channel(PresenceState::Registering);
        Self {
            core: Arc::new(PresenceCore {
                registrar,
                state,
                tick_lock: Mutex::new(()),
            }),
            // tokio intervals panic on a zero period
            interval: interval.max(Duration::from_millis(1)),
            task: None,
        }
    }

    /// Register once, then start the heartbeat task.
    ///
    /// A failed initial registration does not fail startup: the loop keeps
    /// running and the first heartbeat's 404 triggers another attempt.
    pub async fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            return Err(AgentError::PresenceAlreadyRunning);
        }

        if let Err(e) = self.core.register().await {
            warn!(
                "[PRESENCE] ⚠ Initial registration failed, continuing unregistered: {}",
                e
            );
        }

        let core = Arc::clone(&self.core);
        let period = self.interval;
        self.task = Some(tokio::spawn(async move {
            debug!("[PRESENCE] Heartbeat task started (every {:?})", period);
            // First heartbeat one full period after registration
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                core.tick().await;
            }
        }));

        Ok(())
    }

    /// Run one heartbeat now, outside the schedule.
    ///
    /// Waits for any tick already in flight, so re-registrations never overlap.
    pub async fn tick(&self) -> TickOutcome {
        self.core.tick().await
    }

    /// Cancel the heartbeat task. Returns `false` if it was not running.
    pub async fn stop(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };

        task.abort();
        // Wait so no tick can still be in flight once this returns
        let _ = task.await;
        self.core.set_state(PresenceState::Stopped);
        debug!("[PRESENCE] Heartbeat task stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn state(&self) -> PresenceState {
        *self.core.state.borrow()
    }

    /// Observe state changes. Receivers can read but never write.
    pub fn subscribe(&self) -> watch::Receiver<PresenceState> {
        self.core.state.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for PresenceLoop {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
