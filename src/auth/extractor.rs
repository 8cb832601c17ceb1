// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the two auth guards.
//!
//! ```rust,ignore
//! async fn handler(Bearer(context): Bearer) -> impl IntoResponse {
//!     // context.credentials holds the tenant's upstream key/secret
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{context::RequestContext, error::AuthError};
use crate::state::AppState;

/// Inbound header carrying the tenant identifier.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Bearer guard: rejects with 403 unless `Authorization` carries a valid
/// session token whose tenant still resolves.
pub struct Bearer(pub RequestContext);

impl FromRequestParts<AppState> for Bearer {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        state
            .authenticator
            .authorize(header)
            .map(Bearer)
            .inspect_err(|e| {
                warn!(path = %parts.uri.path(), reason = e.reason(), "Bearer authorization rejected");
            })
    }
}

/// Raw `x-api-key` header value, if present and valid UTF-8.
///
/// Resolution happens inside the exchange so the check order stays fixed.
pub struct ApiKeyHeader(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for ApiKeyHeader {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ApiKeyHeader(
            parts
                .headers
                .get(API_KEY_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        ))
    }
}
