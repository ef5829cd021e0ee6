// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the switchboard agent

/// Result type alias using AgentError
pub type Result<T> = std::result::Result<T, AgentError>;

/// Outcome of a failed broker call.
///
/// Produced only by the transport client; nothing above it sees raw
/// `reqwest` errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// No response within the call's deadline
    #[error("Broker request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// DNS failure, refused or reset connection, and similar
    #[error("Cannot reach broker: {0}")]
    Network(String),

    /// Non-2xx response. `message` is the broker's own error text when it sent one.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 2xx response whose body is not the JSON we expected
    #[error("Broker responded but the response was malformed (HTTP {status}): {detail}")]
    Malformed { status: u16, detail: String },
}

impl BrokerError {
    /// HTTP status, when the broker answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            BrokerError::Rejected { status, .. } | BrokerError::Malformed { status, .. } => {
                Some(*status)
            }
            BrokerError::Timeout { .. } | BrokerError::Network(_) => None,
        }
    }

    /// The broker does not know the requested resource (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, BrokerError::Rejected { status: 404, .. })
    }

    /// The broker could not be reached or did not answer in time
    pub fn is_transport(&self) -> bool {
        matches!(self, BrokerError::Timeout { .. } | BrokerError::Network(_))
    }
}

/// Error types for the switchboard agent
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Broker call failed
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Broker URL is unusable; fatal at startup
    #[error("Invalid broker endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Caller-supplied value rejected before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A second heartbeat loop was requested while one is active
    #[error("Presence loop already running")]
    PresenceAlreadyRunning,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl AgentError {
    /// The underlying broker error, if this failure came from the broker
    pub fn as_broker(&self) -> Option<&BrokerError> {
        match self {
            AgentError::Broker(e) => Some(e),
            _ => None,
        }
    }
}
