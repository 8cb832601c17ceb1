// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-time-token exchange and bearer verification.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{context::RequestContext, error::AuthError, token::TokenSigner};
use crate::{
    providers::PlatformClient,
    tenant::{is_uuid_v4, CredentialResolver, TenantId},
};

/// Field added to the upstream payload on a successful exchange.
pub const TOKEN_FIELD: &str = "token";

/// Scheme accepted (case-insensitively) in front of a bearer token.
const BEARER_SCHEME: &str = "bearer";

/// Issues session tokens and turns presented tokens back into upstream
/// credentials.
///
/// Tokens only ever carry a tenant identifier. Every [`authorize`] call
/// re-resolves that identifier against the live [`CredentialResolver`], so
/// removing a tenant's secret from configuration revokes all of its tokens.
///
/// [`authorize`]: SessionAuthenticator::authorize
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    resolver: CredentialResolver,
    signer: Arc<TokenSigner>,
}

impl SessionAuthenticator {
    pub fn new(resolver: CredentialResolver, signer: TokenSigner) -> Self {
        Self {
            resolver,
            signer: Arc::new(signer),
        }
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Redeem a one-time token upstream and mint a session token for it.
    ///
    /// Checks run in order: api key (403), token presence (400), token shape
    /// (401). Only then is the upstream contacted. The returned object is the
    /// upstream payload with a [`TOKEN_FIELD`] added.
    pub async fn exchange_one_time_token(
        &self,
        platform: &PlatformClient,
        api_key: Option<&str>,
        ott: Option<&str>,
    ) -> Result<Map<String, Value>, AuthError> {
        let tenant = api_key
            .and_then(TenantId::parse)
            .ok_or(AuthError::UnknownOrMissingApiKey)?;
        let credentials = self
            .resolver
            .resolve_tenant(&tenant)
            .ok_or(AuthError::UnknownOrMissingApiKey)?;

        let ott = ott
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingToken)?;
        if !is_uuid_v4(ott) {
            return Err(AuthError::InvalidTokenFormat);
        }

        let payload = platform
            .get_json(&format!("/xapp/ott/{ott}"), &credentials)
            .await
            .map_err(|e| {
                warn!(tenant = %tenant, error = %e, "One-time token redemption failed");
                AuthError::Upstream(e.to_string())
            })?;

        let Value::Object(mut payload) = payload else {
            warn!(tenant = %tenant, "Upstream one-time token payload is not an object");
            return Err(AuthError::Upstream(
                "Upstream returned an unexpected one-time token payload".to_string(),
            ));
        };

        let token = self
            .signer
            .mint(&tenant, Some(ott))
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        payload.insert(TOKEN_FIELD.to_string(), Value::String(token));

        info!(
            tenant = %tenant,
            ttl_secs = self.signer.ttl().num_seconds(),
            "One-time token exchanged for session token"
        );
        Ok(payload)
    }

    /// Verify a bearer header value and resolve the tenant it is bound to.
    ///
    /// Every failure is a 403: [`AuthError::InvalidToken`] for signature,
    /// expiry or format problems, [`AuthError::TokenAppUnresolvable`] when the
    /// `app` claim is not a UUID v4 or no longer configured.
    pub fn authorize(&self, bearer: Option<&str>) -> Result<RequestContext, AuthError> {
        let token = bearer
            .map(strip_bearer_prefix)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidToken)?;

        let claims = self.signer.verify(token).map_err(|e| {
            debug!(error = %e, "Bearer token rejected");
            AuthError::InvalidToken
        })?;

        let tenant = TenantId::parse(&claims.app).ok_or(AuthError::TokenAppUnresolvable)?;
        let credentials = self
            .resolver
            .resolve_tenant(&tenant)
            .ok_or(AuthError::TokenAppUnresolvable)?;

        Ok(RequestContext {
            tenant,
            credentials,
            ott: claims.ott,
        })
    }
}

/// Strip an optional `Bearer` scheme (any case, optional `:` and spaces).
pub fn strip_bearer_prefix(value: &str) -> &str {
    let value = value.trim();
    match value.get(..BEARER_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            let rest = value[BEARER_SCHEME.len()..].trim_start();
            rest.strip_prefix(':').unwrap_or(rest).trim_start()
        }
        _ => value,
    }
}
