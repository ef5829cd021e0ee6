// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Core building blocks shared by every accessor: the broker endpoint, the
//! transport client, the process identity and the error types.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod identity;

pub use client::BrokerClient;
pub use endpoint::BrokerEndpoint;
pub use error::{AgentError, BrokerError, Result};
pub use identity::{normalize_agent_id, Identity};
