// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Shared key/value context accessor

use crate::core::client::encode_segment;
use crate::core::error::{AgentError, Result};
use crate::core::{BrokerClient, Identity};
use crate::models::{ContextEntry, ContextListing, ContextSummary};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Get/set/list over the broker's context store. Values are opaque strings.
#[derive(Debug, Clone)]
pub struct ContextStore {
    client: BrokerClient,
    identity: Arc<Identity>,
}

impl ContextStore {
    pub fn new(client: BrokerClient, identity: Arc<Identity>) -> Self {
        Self { client, identity }
    }

    /// Upsert `key`. Last write wins at the broker.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        let body = json!({
            "key": key,
            "value": value,
            "setBy": self.identity.agent_id(),
        });

        self.client.post::<Value>("/context", Some(body)).await?;
        debug!("[CONTEXT] Set '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    /// Fetch one entry. A missing key is the broker's error, passed through.
    pub async fn get(&self, key: &str) -> Result<ContextEntry> {
        check_key(key)?;
        let path = format!("/context/{}", encode_segment(key));
        let mut entry: ContextEntry = self.client.get(&path).await?;
        if entry.key.is_empty() {
            entry.key = key.to_string();
        }
        Ok(entry)
    }

    /// All keys with last writer and timestamp, without values.
    pub async fn list(&self) -> Result<Vec<ContextSummary>> {
        let listing: ContextListing = self.client.get("/context").await?;
        Ok(listing.contexts)
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(AgentError::InvalidArgument(
            "context key must not be empty".to_string(),
        ));
    }
    // "." and ".." would be resolved away as dot-segments of the URL path
    if key.chars().all(|c| c == '.') {
        return Err(AgentError::InvalidArgument(format!(
            "context key '{key}' cannot be addressed (only dots)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keys_rejected() {
        assert!(matches!(check_key(""), Err(AgentError::InvalidArgument(_))));
        assert!(matches!(check_key("  "), Err(AgentError::InvalidArgument(_))));
        assert!(check_key("api-schema").is_ok());
    }

    #[test]
    fn test_dot_only_keys_rejected() {
        for key in [".", "..", "..."] {
            assert!(matches!(check_key(key), Err(AgentError::InvalidArgument(_))));
        }
        assert!(check_key("v1.2").is_ok());
        assert!(check_key(".env").is_ok());
    }
}
