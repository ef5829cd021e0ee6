// Copyright 2025 Switchboard Contributors.
// SPDX-License-Identifier: Apache-2.0

//! Broker transport client
//!
//! Issues exactly one HTTP request per call, bounded by a timeout, and folds
//! every failure mode into a [`BrokerError`]. It does not log, retry, or touch
//! shared state; callers decide what a failure means.

use crate::core::endpoint::BrokerEndpoint;
use crate::core::error::{AgentError, BrokerError, Result};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error as _;
use std::time::Duration;

/// HTTP client bound to one broker endpoint
#[derive(Debug, Clone)]
pub struct BrokerClient {
    http: reqwest::Client,
    endpoint: BrokerEndpoint,
    timeout: Duration,
}

impl BrokerClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `endpoint` - Validated broker base URL
    /// * `timeout` - Deadline applied to every call made through [`BrokerClient::call`]
    pub fn new(endpoint: BrokerEndpoint, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AgentError::HttpClient(e.to_string()))?;

        Ok(Self::with_http_client(endpoint, timeout, http))
    }

    /// Create a client around a pre-configured `reqwest::Client`.
    pub fn with_http_client(
        endpoint: BrokerEndpoint,
        timeout: Duration,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &BrokerEndpoint {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, BrokerError> {
        self.call(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<T, BrokerError> {
        self.call(Method::POST, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, BrokerError> {
        self.call(Method::DELETE, path, None).await
    }

    /// Issue one request with the client's default timeout
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<T, BrokerError> {
        self.call_with_timeout(method, path, body, self.timeout).await
    }

    /// Issue one request with an explicit timeout and decode the JSON body into `T`.
    ///
    /// A body that is valid JSON but does not fit `T` is reported as
    /// [`BrokerError::Malformed`], same as a body that is not JSON at all.
    pub async fn call_with_timeout<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        timeout: Duration,
    ) -> std::result::Result<T, BrokerError> {
        let (status, value) = self.send(method, path, body, timeout).await?;
        serde_json::from_value(value).map_err(|e| BrokerError::Malformed {
            status: status.as_u16(),
            detail: format!("unexpected response shape: {e}"),
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        timeout: Duration,
    ) -> std::result::Result<(StatusCode, Value), BrokerError> {
        let url = self.endpoint.url_for(path);
        let mut request = self.http.request(method, &url).timeout(timeout);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(&e, timeout))?;
        let status = response.status();
        let bytes = response.bytes().await;

        if !status.is_success() {
            let message = bytes
                .ok()
                .and_then(|b| broker_error_message(&b))
                .unwrap_or_else(|| synthesized_message(status));
            return Err(BrokerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = bytes.map_err(|e| classify_transport_error(&e, timeout))?;
        if status == StatusCode::NO_CONTENT {
            return Ok((status, Value::Null));
        }

        serde_json::from_slice(&bytes)
            .map(|value| (status, value))
            .map_err(|e| BrokerError::Malformed {
                status: status.as_u16(),
                detail: format!("body is not valid JSON: {e}"),
            })
    }
}

fn classify_transport_error(err: &reqwest::Error, timeout: Duration) -> BrokerError {
    if err.is_timeout() {
        return BrokerError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };
    }

    // reqwest's own Display hides the interesting part (refused, DNS, reset)
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    BrokerError::Network(description)
}

/// Pull the broker's error text out of an error body (`{"error": "..."}`).
fn broker_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn synthesized_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

/// Percent-encode one path segment (context keys may hold arbitrary text)
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
