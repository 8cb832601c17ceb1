// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-guarded forwarding endpoints.
//!
//! Each handler forwards the inbound path and query verbatim to the upstream
//! platform with the caller's tenant credentials and relays the JSON body.
//! Path parameters are not validated here; upstream owns their semantics.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::Uri,
    Json,
};
use serde_json::Value;

use crate::{
    auth::{Bearer, RequestContext},
    error::ApiError,
    providers::PlatformError,
    state::AppState,
};

/// List curated assets.
#[utoipa::path(
    get,
    path = "/curated-assets",
    tag = "Platform",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upstream curated assets"),
        (status = 400, description = "Upstream error", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid token", body = crate::error::ErrorBody)
    )
)]
pub async fn curated_assets(
    Bearer(context): Bearer,
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    forward_get(&state, &context, &uri).await
}

/// Create a sign request payload.
#[utoipa::path(
    post,
    path = "/payload",
    tag = "Platform",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upstream payload creation result"),
        (status = 400, description = "Invalid body or upstream error", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid token", body = crate::error::ErrorBody)
    )
)]
pub async fn create_payload(
    Bearer(context): Bearer,
    State(state): State<AppState>,
    uri: Uri,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    state
        .platform
        .post_json(path_and_query(&uri), &context.credentials, &body)
        .await
        .map(Json)
        .map_err(upstream_error)
}

/// Fetch a payload.
#[utoipa::path(
    get,
    path = "/payload/{payload_uuid}",
    tag = "Platform",
    security(("bearer_auth" = [])),
    params(("payload_uuid" = String, Path, description = "Payload identifier, passed through as-is")),
    responses(
        (status = 200, description = "Upstream payload"),
        (status = 400, description = "Upstream error", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid token", body = crate::error::ErrorBody)
    )
)]
pub async fn get_payload(
    Bearer(context): Bearer,
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    forward_get(&state, &context, &uri).await
}

/// Fetch exchange rates for a currency.
#[utoipa::path(
    get,
    path = "/rates/{currency}",
    tag = "Platform",
    security(("bearer_auth" = [])),
    params(("currency" = String, Path, description = "Currency code, passed through as-is")),
    responses(
        (status = 200, description = "Upstream rates"),
        (status = 400, description = "Upstream error", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid token", body = crate::error::ErrorBody)
    )
)]
pub async fn get_rates(
    Bearer(context): Bearer,
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    forward_get(&state, &context, &uri).await
}

async fn forward_get(
    state: &AppState,
    context: &RequestContext,
    uri: &Uri,
) -> Result<Json<Value>, ApiError> {
    state
        .platform
        .get_json(path_and_query(uri), &context.credentials)
        .await
        .map(Json)
        .map_err(upstream_error)
}

/// Inbound path and query, forwarded as-is. A `..` parameter resolves to
/// the upstream base and no higher; see `PlatformClient::endpoint`.
fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

fn upstream_error(error: PlatformError) -> ApiError {
    ApiError::bad_request(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_query_keeps_query_string() {
        let uri: Uri = "/curated-assets?limit=5".parse().unwrap();
        assert_eq!(path_and_query(&uri), "/curated-assets?limit=5");

        let uri: Uri = "/payload/not-a-uuid".parse().unwrap();
        assert_eq!(path_and_query(&uri), "/payload/not-a-uuid");
    }

    #[test]
    fn upstream_errors_map_to_400_with_message() {
        let error = upstream_error(PlatformError::Status {
            status: 404,
            message: "Payload not found".to_string(),
        });
        assert_eq!(error.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(error.message, "Payload not found");
    }
}
