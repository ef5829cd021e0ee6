// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Node startup and one-shot shutdown

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use switchboard_agent::{AgentError, AgentNode, MessageKind, PresenceState, WorkspaceService};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer};

async fn mount_teardown(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/context"))
        .and(body_json(json!({
            "key": "test-agent-status",
            "value": "offline",
            "setBy": "test-agent"
        })))
        .respond_with(ok_json(json!({ "success": true })))
        .expect(times)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/agents/test-agent"))
        .respond_with(ok_json(json!({ "success": true })))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_start_registers_normalized_identity() {
    let server = MockServer::start().await;
    mount_register_ok(&server).await;

    let node = AgentNode::start(&config_for(&server.uri())).await.unwrap();

    assert_eq!(node.whoami().agent_id(), "test-agent");
    assert_eq!(node.whoami().name(), "Agent test-agent");
    assert_eq!(node.whoami().project(), "unknown");
    assert!(node.is_registered());
    assert_eq!(requests_to(&server, "POST", "/agents/register").await, 1);
}

#[tokio::test]
async fn test_invalid_endpoint_is_fatal() {
    for url in [
        "ftp://localhost:4800",
        "not a url",
        "file:///tmp/broker",
        "http://localhost:4800/?x=1",
    ] {
        let result = AgentNode::start(&config_for(url)).await;
        assert!(
            matches!(result, Err(AgentError::InvalidEndpoint { .. })),
            "{url} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_unreachable_broker_is_not_fatal() {
    let node = AgentNode::start(&config_for(&closed_port_url()))
        .await
        .unwrap();
    assert!(!node.is_registered());
    assert_eq!(node.presence_state(), PresenceState::UnknownToBroker);

    // Accessors fail but stay usable
    assert!(node.list_agents().await.is_err());
    assert!(node.shutdown().await);
}

#[tokio::test]
async fn test_shutdown_twice_tears_down_once() {
    let server = MockServer::start().await;
    mount_register_ok(&server).await;
    mount_teardown(&server, 1).await;

    let node = AgentNode::start(&config_for(&server.uri())).await.unwrap();

    assert!(node.shutdown().await);
    assert!(!node.shutdown().await);
    assert_eq!(node.presence_state(), PresenceState::Stopped);
    assert!(!node.is_registered());
}

#[tokio::test]
async fn test_concurrent_shutdown_requests_tear_down_once() {
    let server = MockServer::start().await;
    mount_register_ok(&server).await;
    mount_teardown(&server, 1).await;

    let node = AgentNode::start(&config_for(&server.uri())).await.unwrap();
    let first = node.shutdown_coordinator();
    let second = node.shutdown_coordinator();

    let (a, b) = tokio::join!(first.shutdown(), second.shutdown());
    assert!(a ^ b, "exactly one caller performs teardown");
    assert!(first.has_fired());
}

#[tokio::test]
async fn test_teardown_continues_after_failed_status_update() {
    let server = MockServer::start().await;
    mount_register_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/context"))
        .respond_with(broker_error(500, "store unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/agents/test-agent"))
        .respond_with(ok_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let node = AgentNode::start(&config_for(&server.uri())).await.unwrap();
    assert!(node.shutdown().await);
}

#[tokio::test]
async fn test_deregistration_bounded_by_shutdown_timeout() {
    let server = MockServer::start().await;
    mount_register_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/context"))
        .respond_with(ok_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/agents/test-agent"))
        .respond_with(ok_json(json!({})).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let node = AgentNode::start(&config_for(&server.uri())).await.unwrap();
    let started = Instant::now();
    assert!(node.shutdown().await);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_node_is_usable_as_service_object() {
    let server = MockServer::start().await;
    mount_register_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/messages/send"))
        .respond_with(ok_json(json!({ "messageId": "m-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let node = AgentNode::start(&config_for(&server.uri())).await.unwrap();
    let service: Arc<dyn WorkspaceService> = Arc::new(node);

    assert_eq!(service.whoami().agent_id(), "test-agent");
    let id = service
        .send_message("frontend", "ready", MessageKind::Text)
        .await
        .unwrap();
    assert_eq!(id, "m-1");
}
