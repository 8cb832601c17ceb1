// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Rejection produced by the one-time-token exchange or bearer verification.
///
/// Every variant is terminal for the current request and maps to a 4xx
/// status, except [`AuthError::Internal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// `x-api-key` missing, not a UUID v4, or not configured
    UnknownOrMissingApiKey,
    /// No one-time token in the request path
    MissingToken,
    /// One-time token is not a UUID v4
    InvalidTokenFormat,
    /// Bearer token missing, tampered, expired or malformed
    InvalidToken,
    /// Bearer token is valid but its `app` claim no longer resolves
    TokenAppUnresolvable,
    /// Upstream platform rejected the call (message passed through)
    Upstream(String),
    /// Token could not be minted
    Internal(String),
}

impl AuthError {
    /// Short machine-readable reason, used in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::UnknownOrMissingApiKey => "unknown_or_missing_api_key",
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidTokenFormat => "invalid_token_format",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenAppUnresolvable => "token_app_unresolvable",
            AuthError::Upstream(_) => "upstream_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::Upstream(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidTokenFormat => StatusCode::UNAUTHORIZED,
            AuthError::UnknownOrMissingApiKey
            | AuthError::InvalidToken
            | AuthError::TokenAppUnresolvable => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::UnknownOrMissingApiKey => {
                write!(f, "Preflight error: unknown or missing x-api-key header")
            }
            AuthError::MissingToken => write!(f, "Token undefined"),
            AuthError::InvalidTokenFormat => write!(f, "Invalid one-time token format"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::TokenAppUnresolvable => {
                write!(f, "Token is not bound to a known application")
            }
            AuthError::Upstream(msg) => write!(f, "{msg}"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::new(error.status_code(), error.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
