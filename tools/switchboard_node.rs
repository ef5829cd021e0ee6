// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Switchboard node process.
//!
//! Loads configuration, starts logging, registers the agent and keeps it
//! present until SIGTERM/SIGINT, then tears down and exits 0. The only
//! fatal startup error is an unusable configuration or broker URL; an
//! unreachable broker is logged and retried by the heartbeat loop.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::{self, ExitCode};

use anyhow::Context;
use switchboard::agent::AgentNode;
use switchboard::config::{load_config, SwitchboardConfig};
use switchboard::logging_settings;
use switchboard::observability::{debug_flags_help, init_logging, parse_debug_flags};
use tracing::{error, info};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: switchboard-node [options]\n\n\
         Options:\n  \
           --config <path>                 TOML config file (default: search for switchboard.toml)\n  \
           --broker-url <url>              Broker base URL (http or https)\n  \
           --agent-id <id>                 Agent identifier (default: host name)\n  \
           --agent-name <name>             Display name\n  \
           --project <label>               Project label\n  \
           --heartbeat-interval-ms <ms>    Heartbeat period\n  \
           --log-level <level>             trace, debug, info, warn or error\n  \
           --log-format <format>           text or json\n  \
           --log-dir <path>                Directory for per-run log files\n  \
           -h, --help                      Show this help\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

/// Parse arguments into an optional config path and config overrides.
/// `--debug-*` flags are left for the logging setup.
fn parse_args() -> (Option<PathBuf>, HashMap<String, String>) {
    let mut config_path = None;
    let mut overrides = HashMap::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let key = match arg.as_str() {
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                config_path = Some(PathBuf::from(v));
                continue;
            }
            "--broker-url" => "broker_url",
            "--agent-id" => "agent_id",
            "--agent-name" => "agent_name",
            "--project" => "project",
            "--heartbeat-interval-ms" => "heartbeat_interval_ms",
            "--log-level" => "log_level",
            "--log-format" => "log_format",
            "--log-dir" => "log_dir",
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => continue,
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        };
        let v = args.next().unwrap_or_else(|| usage_and_exit());
        overrides.insert(key.to_string(), v);
    }

    (config_path, overrides)
}

async fn run(config: SwitchboardConfig) -> anyhow::Result<()> {
    let node = AgentNode::start(&config)
        .await
        .context("Cannot start switchboard node")?;

    info!(
        "[NODE] Agent {} is up (presence: {:?})",
        node.identity().agent_id(),
        node.presence_state()
    );

    if let Err(e) = node.run_until_signal().await {
        // Without signal handlers we cannot wait; leave the broker cleanly anyway
        node.shutdown().await;
        return Err(e).context("Cannot install termination signal handlers");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let (config_path, overrides) = parse_args();

    let config = match load_config(config_path.as_deref(), Some(&overrides)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("switchboard-node: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Dropped on return, after the last log line, so file writers flush
    let _logging = match init_logging(&parse_debug_flags(), &logging_settings(&config.logging)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("switchboard-node: failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("switchboard-node: {e:#}");
            ExitCode::FAILURE
        }
    }
}
