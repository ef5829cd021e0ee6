// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults, optional)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, ConfigError, ConfigResult, SwitchboardConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "switchboard.toml";

/// Find the switchboard configuration file
///
/// Search order:
/// 1. `SWITCHBOARD_CONFIG_PATH` environment variable
/// 2. Current working directory: `./switchboard.toml`
/// 3. Up to 5 parent directories
///
/// Returns `Ok(None)` when no file exists in the default locations. A path
/// given through `SWITCHBOARD_CONFIG_PATH` that does not exist is an error.
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Some(env_path) = non_empty_var("SWITCHBOARD_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SWITCHBOARD_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let Ok(cwd) = env::current_dir() else {
        return Ok(None);
    };

    let mut search_paths = vec![cwd.join(CONFIG_FILE_NAME)];
    let mut current = cwd.as_path();
    for _ in 0..5 {
        match current.parent() {
            Some(parent) => {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent;
            }
            None => break,
        }
    }

    Ok(search_paths.into_iter().find(|p| p.exists()))
}

/// Load configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for one
///   and fall back to built-in defaults when nothing is found.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if an explicit config file is missing, contains invalid TOML,
/// or the merged configuration fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SwitchboardConfig> {
    let config_file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match config_file {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            toml::from_str::<SwitchboardConfig>(&content)?
        }
        None => SwitchboardConfig::default(),
    };

    apply_environment_overrides(&mut config)?;

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SWITCHBOARD_BROKER_URL` -> `broker.url`
/// - `SWITCHBOARD_AGENT_ID` -> `agent.id`
/// - `SWITCHBOARD_AGENT_NAME` -> `agent.name`
/// - `SWITCHBOARD_PROJECT` -> `agent.project`
/// - `SWITCHBOARD_HEARTBEAT_INTERVAL_MS` -> `presence.heartbeat_interval_ms`
/// - `SWITCHBOARD_LOG_LEVEL` -> `logging.level`
/// - `SWITCHBOARD_LOG_FORMAT` -> `logging.format`
/// - `SWITCHBOARD_LOG_DIR` -> `logging.directory`
///
/// Empty values are ignored.
pub fn apply_environment_overrides(config: &mut SwitchboardConfig) -> ConfigResult<()> {
    if let Some(value) = non_empty_var("SWITCHBOARD_BROKER_URL") {
        config.broker.url = value;
    }

    if let Some(value) = non_empty_var("SWITCHBOARD_AGENT_ID") {
        config.agent.id = Some(value);
    }
    if let Some(value) = non_empty_var("SWITCHBOARD_AGENT_NAME") {
        config.agent.name = Some(value);
    }
    if let Some(value) = non_empty_var("SWITCHBOARD_PROJECT") {
        config.agent.project = Some(value);
    }

    if let Some(value) = non_empty_var("SWITCHBOARD_HEARTBEAT_INTERVAL_MS") {
        config.presence.heartbeat_interval_ms = parse_millis("SWITCHBOARD_HEARTBEAT_INTERVAL_MS", &value)?;
    }

    if let Some(value) = non_empty_var("SWITCHBOARD_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Some(value) = non_empty_var("SWITCHBOARD_LOG_FORMAT") {
        config.logging.format = value;
    }
    if let Some(value) = non_empty_var("SWITCHBOARD_LOG_DIR") {
        config.logging.directory = Some(PathBuf::from(value));
    }

    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"broker_url": "http://10.0.0.5:4800"}`)
pub fn apply_cli_overrides(
    config: &mut SwitchboardConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("broker_url") {
        config.broker.url = value.clone();
    }
    if let Some(value) = cli_args.get("agent_id") {
        config.agent.id = Some(value.clone());
    }
    if let Some(value) = cli_args.get("agent_name") {
        config.agent.name = Some(value.clone());
    }
    if let Some(value) = cli_args.get("project") {
        config.agent.project = Some(value.clone());
    }
    if let Some(value) = cli_args.get("heartbeat_interval_ms") {
        config.presence.heartbeat_interval_ms = parse_millis("heartbeat_interval_ms", value)?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
    if let Some(value) = cli_args.get("log_dir") {
        config.logging.directory = Some(PathBuf::from(value));
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_millis(source: &str, value: &str) -> ConfigResult<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        ConfigError::InvalidValue(format!("{source} must be a whole number of milliseconds, got '{value}'"))
    })
}
