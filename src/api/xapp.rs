// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-time-token exchange endpoint.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{Map, Value};

use crate::{
    auth::{ApiKeyHeader, AuthError},
    state::AppState,
};

/// Stand-in for a path segment that is not valid UTF-8.
const UNDECODABLE_TOKEN: &str = "\u{FFFD}";

/// Redeem a one-time token and receive a session token.
///
/// Returns the upstream one-time-token payload unchanged except for an added
/// `token` field holding the bearer token for subsequent calls.
#[utoipa::path(
    get,
    path = "/xapp/ott/{token}",
    tag = "xApp",
    params(
        ("token" = String, Path, description = "One-time token (UUID v4)"),
        ("x-api-key" = String, Header, description = "Tenant identifier (UUID v4)")
    ),
    responses(
        (status = 200, description = "Upstream payload with an added `token` field"),
        (status = 400, description = "Token missing or upstream error", body = crate::error::ErrorBody),
        (status = 401, description = "Token is not a UUID v4", body = crate::error::ErrorBody),
        (status = 403, description = "Unknown or missing x-api-key", body = crate::error::ErrorBody)
    )
)]
pub async fn exchange_ott(
    State(state): State<AppState>,
    ApiKeyHeader(api_key): ApiKeyHeader,
    token: Result<Path<String>, PathRejection>,
) -> Result<Json<Map<String, Value>>, AuthError> {
    match token {
        Ok(Path(token)) => exchange(&state, api_key.as_deref(), Some(&token)).await,
        // Undecodable segment: keep the api-key check first, then fail the shape check.
        Err(_) => exchange(&state, api_key.as_deref(), Some(UNDECODABLE_TOKEN)).await,
    }
}

/// `/xapp/ott` without a token segment.
pub async fn exchange_missing_ott(
    State(state): State<AppState>,
    ApiKeyHeader(api_key): ApiKeyHeader,
) -> Result<Json<Map<String, Value>>, AuthError> {
    exchange(&state, api_key.as_deref(), None).await
}

async fn exchange(
    state: &AppState,
    api_key: Option<&str>,
    ott: Option<&str>,
) -> Result<Json<Map<String, Value>>, AuthError> {
    state
        .authenticator
        .exchange_one_time_token(&state.platform, api_key, ott)
        .await
        .map(Json)
}
