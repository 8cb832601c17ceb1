// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! xApp platform API transport.
//!
//! Every call carries the tenant's `X-API-Key` / `X-API-Secret` pair and is
//! bounded by the client timeout. Nothing is retried.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::tenant::CredentialPair;

pub const DEFAULT_BASE_URL: &str = "https://xumm.app/api/v1/platform";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Platform client could not be built: {0}")]
    Client(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream request failed: {0}")]
    Request(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Upstream response was invalid: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the upstream platform.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    base_url: String,
    http: Client,
}

impl PlatformClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, PlatformError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}{path_and_query}`.
    pub async fn get_json(
        &self,
        path_and_query: &str,
        credentials: &CredentialPair,
    ) -> Result<Value, PlatformError> {
        self.send(Method::GET, path_and_query, credentials, None)
            .await
    }

    /// `POST {base}{path_and_query}` with a JSON body.
    pub async fn post_json(
        &self,
        path_and_query: &str,
        credentials: &CredentialPair,
        body: &Value,
    ) -> Result<Value, PlatformError> {
        self.send(Method::POST, path_and_query, credentials, Some(body))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        credentials: &CredentialPair,
        body: Option<&Value>,
    ) -> Result<Value, PlatformError> {
        let url = self.endpoint(path_and_query);
        debug!(%method, %url, tenant = %credentials.key, "Forwarding request upstream");

        let mut request = self.http.request(method, &url);
        for (name, value) in credentials.headers() {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout
            } else {
                PlatformError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout
            } else {
                PlatformError::Request(format!("failed to read response body: {e}"))
            }
        })?;

        if !status.is_success() {
            let message = upstream_error_message(&text)
                .unwrap_or_else(|| format!("Upstream returned {status}"));
            warn!(%url, status = status.as_u16(), %message, "Upstream rejected request");
            return Err(PlatformError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }

    /// Base URL plus the inbound path, unchanged. Dot segments (`..`,
    /// `%2e%2e`) are resolved when the URL is parsed. Each forwarded route
    /// allows one free segment, so the result never rises above the base.
    fn endpoint(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{}", self.base_url, path_and_query)
        } else {
            format!("{}/{}", self.base_url, path_and_query)
        }
    }
}

/// Pull a readable message out of an upstream error body.
fn upstream_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    json.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| json.get("message").and_then(Value::as_str))
        .or_else(|| json.get("error").and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            json.pointer("/error/code")
                .filter(|code| !code.is_null())
                .map(|code| format!("Upstream error {code}"))
        })
}
