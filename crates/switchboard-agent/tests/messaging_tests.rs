// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Send, broadcast, read-then-acknowledge and clear against a mock broker

mod common;

use common::*;
use serde_json::{json, Value};
use switchboard_agent::{AckStatus, AgentError, MessageKind, Messenger, ReadOptions};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INBOX: &str = "/messages/tester";
const ACK: &str = "/messages/tester/ack";

fn messenger_for(server: &MockServer) -> Messenger {
    Messenger::new(client_for(server), identity())
}

fn messages(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": format!("msg-{i}"),
                "from": "backend",
                "fromName": "Backend",
                "type": "code",
                "timestamp": 1_700_000_000_000_i64 + i as i64,
                "content": format!("payload {i}")
            })
        })
        .collect()
}

fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("msg-{i}")).collect()
}

#[tokio::test]
async fn test_send_defaults_to_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages/send"))
        .and(body_json(json!({
            "from": "tester",
            "to": "front",
            "content": "ok",
            "type": "text"
        })))
        .respond_with(ok_json(json!({ "success": true, "messageId": "m-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = messenger_for(&server)
        .send("front", "ok", MessageKind::default())
        .await
        .unwrap();
    assert_eq!(id, "m-42");
}

#[tokio::test]
async fn test_send_to_unknown_recipient_passes_error_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages/send"))
        .respond_with(broker_error(404, "Agent 'ghost' not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = messenger_for(&server)
        .send("ghost", "hello", MessageKind::Schema)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Agent 'ghost' not found");
}

#[tokio::test]
async fn test_broadcast_to_nobody_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages/broadcast"))
        .and(body_partial_json(json!({ "from": "tester", "type": "endpoint" })))
        .respond_with(ok_json(json!({ "success": true, "sentTo": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let sent_to = messenger_for(&server)
        .broadcast("GET /health is live", MessageKind::Endpoint)
        .await
        .unwrap();
    assert_eq!(sent_to, 0);
}

#[tokio::test]
async fn test_read_acknowledges_exactly_what_was_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param("unread", "true"))
        .and(query_param("limit", "20"))
        .respond_with(ok_json(json!({ "messages": messages(3), "hasMore": false })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACK))
        .and(body_json(json!({ "ids": ids(3) })))
        .respond_with(ok_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let inbox = messenger_for(&server)
        .read(ReadOptions::default())
        .await
        .unwrap();

    assert_eq!(inbox.len(), 3);
    assert_eq!(inbox.messages[0].kind, MessageKind::Code);
    assert_eq!(inbox.messages[0].from_name.as_deref(), Some("Backend"));
    assert_eq!(inbox.ack, AckStatus::Acknowledged(3));
    assert!(!inbox.has_more);
}

#[tokio::test]
async fn test_read_clamps_limit_to_fifty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param("limit", "50"))
        .respond_with(ok_json(json!({ "messages": messages(50), "hasMore": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACK))
        .respond_with(ok_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let inbox = messenger_for(&server)
        .read(ReadOptions::default().with_limit(100))
        .await
        .unwrap();
    assert_eq!(inbox.len(), 50);
    assert!(inbox.has_more);
}

#[tokio::test]
async fn test_read_never_returns_more_than_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param("limit", "2"))
        .respond_with(ok_json(json!({ "messages": messages(5) })))
        .expect(1)
        .mount(&server)
        .await;
    // Only the two returned ids may be acknowledged
    Mock::given(method("POST"))
        .and(path(ACK))
        .and(body_json(json!({ "ids": ids(2) })))
        .respond_with(ok_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let inbox = messenger_for(&server)
        .read(ReadOptions::default().with_limit(2))
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.has_more);
    assert_eq!(inbox.ack, AckStatus::Acknowledged(2));
}

#[tokio::test]
async fn test_zero_limit_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok_json(json!({ "messages": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let err = messenger_for(&server)
        .read(ReadOptions::default().with_limit(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_empty_read_sends_no_ack() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .and(query_param("unread", "false"))
        .respond_with(ok_json(json!({ "messages": [], "hasMore": false })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACK))
        .respond_with(ok_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let inbox = messenger_for(&server)
        .read(ReadOptions::default().include_read())
        .await
        .unwrap();
    assert!(inbox.is_empty());
    assert_eq!(inbox.ack, AckStatus::NotNeeded);
}

#[tokio::test]
async fn test_ack_failure_keeps_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .respond_with(ok_json(json!({ "messages": messages(2) })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACK))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let inbox = messenger_for(&server)
        .read(ReadOptions::default())
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.ack.is_failed());
}

#[tokio::test]
async fn test_fetch_failure_sends_no_ack() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INBOX))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACK))
        .respond_with(ok_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = messenger_for(&server)
        .read(ReadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_broker(),
        Some(switchboard_agent::BrokerError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_clear_returns_count() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(INBOX))
        .respond_with(ok_json(json!({ "success": true, "cleared": 4 })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(messenger_for(&server).clear().await.unwrap(), 4);
}
