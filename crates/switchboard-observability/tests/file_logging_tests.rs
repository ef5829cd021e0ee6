// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Per-run log files are complete once the guard is dropped

#![cfg(feature = "file-logging")]

use switchboard_observability::{init_logging, CrateDebugFlags, LogFormat, LoggingConfig};
use tempfile::tempdir;

#[test]
fn test_last_line_flushed_when_guard_dropped() {
    let dir = tempdir().unwrap();
    let config = LoggingConfig {
        level: "info".to_string(),
        format: LogFormat::Text,
        directory: Some(dir.path().to_path_buf()),
        retention_runs: 3,
    };

    let guard = init_logging(&CrateDebugFlags::default(), &config).unwrap();
    let run_dir = guard.log_dir().unwrap().to_path_buf();
    tracing::error!("Cannot start switchboard node: broker URL rejected");
    drop(guard);

    let contents = std::fs::read_to_string(run_dir.join("switchboard.log")).unwrap();
    let last = contents.lines().last().unwrap();
    assert!(last.contains("broker URL rejected"), "{contents}");
    assert!(last.contains("ERROR"));
}
