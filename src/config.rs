// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and injected; handlers never read the environment.
//!
//! The binary first loads a `.env` file (via `dotenvy`) into the process
//! environment. Variables that are already set take precedence over the file,
//! and every variable below, including `XAPP_<TENANT_UUID>`, may come from it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `XAPP_SECRET` | HS256 secret for session tokens | Required |
//! | `XAPP_<TENANT_UUID>` | Upstream secret for a tenant (upper-snake UUID v4) | None |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `UPSTREAM_BASE_URL` | Upstream platform API root | `https://xumm.app/api/v1/platform` |
//! | `UPSTREAM_TIMEOUT_SECS` | Timeout for every upstream call | `15` |
//! | `SESSION_TTL_SECS` | Validity window of minted tokens, at most 30 days | `14400` |
//! | `CORS_ALLOWED_ORIGINS` | `*` or comma-separated origins | `*` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; both set enables HTTPS | Unset |
//! | `API_DOCS` | Serve Swagger UI at `/docs` | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, fmt, net::SocketAddr, path::PathBuf, time::Duration};

use axum::http::HeaderValue;
use url::Url;

use crate::providers::platform::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const SIGNING_SECRET_ENV: &str = "XAPP_SECRET";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const UPSTREAM_BASE_URL_ENV: &str = "UPSTREAM_BASE_URL";
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
pub const SESSION_TTL_ENV: &str = "SESSION_TTL_SECS";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const API_DOCS_ENV: &str = "API_DOCS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Four hours.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 4 * 60 * 60;

/// Upper bound on `SESSION_TTL_SECS` (30 days).
pub const MAX_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Cross-origin policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// Any origin may call the proxy.
    #[default]
    AnyOrigin,
    /// Only the listed origins.
    AllowList(Vec<HeaderValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(env_optional(LOG_FORMAT_ENV).as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Options consumed by [`crate::api::router`].
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub cors: CorsPolicy,
    pub api_docs: bool,
}

#[derive(Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub signing_secret: String,
    pub upstream_base_url: Url,
    pub upstream_timeout: Duration,
    pub session_ttl: chrono::Duration,
    pub cors: CorsPolicy,
    pub tls: Option<TlsPaths>,
    pub api_docs: bool,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_optional)
    }

    /// Build from an arbitrary lookup. Values are expected trimmed, with
    /// blank values reported as `None`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_secret =
            lookup(SIGNING_SECRET_ENV).ok_or(ConfigError::Missing(SIGNING_SECRET_ENV))?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(value) => parse_number(PORT_ENV, &value)?,
            None => DEFAULT_PORT,
        };

        let upstream_base_url = match lookup(UPSTREAM_BASE_URL_ENV) {
            Some(value) => parse_base_url(&value)?,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };

        let upstream_timeout = match lookup(UPSTREAM_TIMEOUT_ENV) {
            Some(value) => Duration::from_secs(parse_positive(UPSTREAM_TIMEOUT_ENV, &value)?),
            None => DEFAULT_TIMEOUT,
        };

        let session_ttl = match lookup(SESSION_TTL_ENV) {
            Some(value) => parse_session_ttl(&value)?,
            None => chrono::Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        };

        let cors = match lookup(CORS_ALLOWED_ORIGINS_ENV) {
            Some(value) => parse_cors(&value)?,
            None => CorsPolicy::AnyOrigin,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let api_docs = lookup(API_DOCS_ENV)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            signing_secret,
            upstream_base_url,
            upstream_timeout,
            session_ttl,
            cors,
            tls,
            api_docs,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let candidate = format!("{}:{}", self.host, self.port);
        candidate.parse().map_err(|e| invalid(HOST_ENV, &self.host, e))
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            cors: self.cors.clone(),
            api_docs: self.api_docs,
        }
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("signing_secret", &"<redacted>")
            .field("upstream_base_url", &self.upstream_base_url.as_str())
            .field("upstream_timeout", &self.upstream_timeout)
            .field("session_ttl", &self.session_ttl)
            .field("cors", &self.cors)
            .field("tls", &self.tls)
            .field("api_docs", &self.api_docs)
            .finish()
    }
}

fn env_optional(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn invalid(name: &'static str, value: &str, reason: impl fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e| invalid(name, value, e))
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse_number::<u64>(name, value)? {
        0 => Err(invalid(name, value, "must be greater than zero")),
        n => Ok(n),
    }
}

fn parse_session_ttl(value: &str) -> Result<chrono::Duration, ConfigError> {
    let secs = parse_positive(SESSION_TTL_ENV, value)?;
    i64::try_from(secs)
        .ok()
        .filter(|secs| *secs <= MAX_SESSION_TTL_SECS)
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| {
            invalid(
                SESSION_TTL_ENV,
                value,
                format!("must be at most {MAX_SESSION_TTL_SECS} seconds"),
            )
        })
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(UPSTREAM_BASE_URL_ENV, value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(
            UPSTREAM_BASE_URL_ENV,
            value,
            format!("unsupported scheme {other}"),
        )),
    }
}

fn parse_cors(value: &str) -> Result<CorsPolicy, ConfigError> {
    if value == "*" {
        return Ok(CorsPolicy::AnyOrigin);
    }

    let origins = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(invalid(
                    CORS_ALLOWED_ORIGINS_ENV,
                    value,
                    "`*` cannot be combined with explicit origins",
                ));
            }
            HeaderValue::from_str(origin).map_err(|e| invalid(CORS_ALLOWED_ORIGINS_ENV, value, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        Ok(CorsPolicy::AnyOrigin)
    } else {
        Ok(CorsPolicy::AllowList(origins))
    }
}
