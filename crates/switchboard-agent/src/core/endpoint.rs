// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Validated broker base URL

use crate::core::error::{AgentError, Result};
use std::fmt;

/// Base URL of the broker, validated once at startup.
///
/// Only `http` and `https` are accepted. Trailing slashes are stripped so
/// paths can be appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    base: String,
}

impl BrokerEndpoint {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = |reason: String| AgentError::InvalidEndpoint {
            url: raw.to_string(),
            reason,
        };

        let url = reqwest::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(invalid(format!(
                    "unsupported scheme '{other}' (expected http or https)"
                )))
            }
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        // Paths are appended verbatim, so nothing may follow the path
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid(
                "query strings and fragments are not allowed in the base URL".to_string(),
            ));
        }

        Ok(Self {
            base: trimmed.trim_end_matches('/').to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Join an absolute path (`/agents/...`) onto the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
