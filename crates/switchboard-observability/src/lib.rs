// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! # switchboard-observability
//!
//! Logging setup shared by switchboard binaries, with per-crate debug flag
//! support.
//!
//! ## Features
//! - `file-logging`: per-run JSON log files with retention (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known switchboard crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "switchboard",
    "switchboard-agent",
    "switchboard-config",
    "switchboard-observability",
];
