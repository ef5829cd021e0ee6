// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! One-shot graceful teardown
//!
//! Order is fixed: cancel heartbeats, mark the agent offline, deregister.
//! Each step runs even when the previous one failed, and the whole sequence
//! runs at most once no matter how many signals arrive.

use crate::presence::PresenceLoop;
use crate::registration::Registrar;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct ShutdownCoordinator {
    fired: AtomicBool,
    presence: Mutex<PresenceLoop>,
    registrar: Registrar,
}

impl ShutdownCoordinator {
    pub fn new(presence: PresenceLoop, registrar: Registrar) -> Self {
        Self {
            fired: AtomicBool::new(false),
            presence: Mutex::new(presence),
            registrar,
        }
    }

    /// Tear down. Returns `false` if teardown already ran (or is running).
    pub async fn shutdown(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("[SHUTDOWN] Already shut down, ignoring");
            return false;
        }

        let agent_id = self.registrar.identity().agent_id();
        info!("[SHUTDOWN] Shutting down agent {}", agent_id);

        // Heartbeats must be gone before any teardown request goes out
        let was_running = self.presence.lock().await.stop().await;
        debug!("[SHUTDOWN] Presence loop stopped (was running: {})", was_running);

        let marked_offline = self.registrar.set_status("offline").await;
        let deregistered = self.registrar.deregister().await;

        info!(
            "[SHUTDOWN] ✓ Teardown complete (offline: {}, deregistered: {})",
            marked_offline, deregistered
        );
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Block until a termination signal arrives, then tear down.
    pub async fn run_until_signal(&self) -> std::io::Result<()> {
        let signal = wait_for_termination().await?;
        info!("[SHUTDOWN] Received {}", signal);
        self.shutdown().await;
        Ok(())
    }
}

/// Wait for SIGTERM or SIGINT. Returns the signal's name.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for Ctrl-C. Returns the signal's name.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl-C")
}
