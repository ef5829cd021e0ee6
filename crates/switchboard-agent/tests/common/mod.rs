// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for broker contract tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use switchboard_agent::{BrokerClient, BrokerEndpoint, Identity, Registrar};
use switchboard_config::SwitchboardConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AGENT_ID: &str = "tester";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(500);
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(300);

pub fn identity() -> Arc<Identity> {
    Arc::new(Identity::new(
        Some(AGENT_ID),
        Some("Test Agent"),
        Some("switchboard"),
        "/tmp/switchboard",
    ))
}

pub fn client_for(server: &MockServer) -> BrokerClient {
    client_with_timeout(&server.uri(), REQUEST_TIMEOUT)
}

pub fn client_with_timeout(url: &str, timeout: Duration) -> BrokerClient {
    let endpoint = BrokerEndpoint::parse(url).expect("mock server URI is valid");
    BrokerClient::new(endpoint, timeout).expect("http client builds")
}

pub fn registrar_for(server: &MockServer) -> Registrar {
    Registrar::new(client_for(server), identity(), SHUTDOWN_TIMEOUT)
}

/// Config pointing a full node at the mock broker
pub fn config_for(url: &str) -> SwitchboardConfig {
    let mut config = SwitchboardConfig::default();
    config.broker.url = url.to_string();
    config.broker.request_timeout_ms = REQUEST_TIMEOUT.as_millis() as u64;
    config.broker.shutdown_timeout_ms = SHUTDOWN_TIMEOUT.as_millis() as u64;
    config.agent.id = Some("Test Agent".to_string());
    // Long enough that no scheduled heartbeat fires during a test
    config.presence.heartbeat_interval_ms = 60_000;
    config
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn broker_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "error": message }))
}

pub async fn mount_register_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/agents/register"))
        .respond_with(ok_json(json!({ "success": true, "totalAgents": 1 })))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, http_method: &str, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
        .count()
}

/// URL of a local port that was just released, so connecting is refused
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
