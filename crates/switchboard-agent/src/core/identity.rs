// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Process identity: who this node is to the broker.

use serde::Serialize;
use std::path::{Path, PathBuf};
use switchboard_config::AgentConfig;

const FALLBACK_AGENT_ID: &str = "agent";
const DEFAULT_PROJECT: &str = "unknown";

/// Identity of this node, computed once at startup and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    agent_id: String,
    name: String,
    project: String,
    working_path: PathBuf,
}

impl Identity {
    /// Build an identity from raw inputs.
    ///
    /// # Arguments
    /// * `agent_id` - Raw identifier; host name is used when absent or blank
    /// * `name` - Display name; defaults to `"Agent <agentId>"`
    /// * `project` - Project label; defaults to `"unknown"`
    /// * `working_path` - Directory the node was started in
    pub fn new(
        agent_id: Option<&str>,
        name: Option<&str>,
        project: Option<&str>,
        working_path: impl Into<PathBuf>,
    ) -> Self {
        let raw_id = non_blank(agent_id)
            .map(str::to_string)
            .or_else(host_name)
            .unwrap_or_else(|| FALLBACK_AGENT_ID.to_string());
        let agent_id = normalize_agent_id(&raw_id);

        let name = non_blank(name)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Agent {agent_id}"));
        let project = non_blank(project).unwrap_or(DEFAULT_PROJECT).to_string();

        Self {
            agent_id,
            name,
            project,
            working_path: working_path.into(),
        }
    }

    /// Build the identity from configuration and the current directory.
    pub fn from_config(config: &AgentConfig) -> Self {
        let working_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(
            config.id.as_deref(),
            config.name.as_deref(),
            config.project.as_deref(),
            working_path,
        )
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn working_path(&self) -> &Path {
        &self.working_path
    }

    /// Context key under which this agent publishes its status
    pub fn status_key(&self) -> String {
        format!("{}-status", self.agent_id)
    }
}

/// Lowercase the input, then replace every character outside `[a-z0-9-]` with `-`.
///
/// Non-empty input always yields non-empty output.
pub fn normalize_agent_id(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn host_name() -> Option<String> {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.trim().is_empty())
}
