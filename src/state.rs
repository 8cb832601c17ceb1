// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{SessionAuthenticator, TokenSigner},
    config::ProxyConfig,
    providers::{PlatformClient, PlatformError},
    tenant::{CredentialResolver, CredentialSource},
};

/// Shared handler state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<SessionAuthenticator>,
    pub platform: PlatformClient,
}

impl AppState {
    pub fn new(authenticator: SessionAuthenticator, platform: PlatformClient) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            platform,
        }
    }

    /// Wire the resolver, signer and upstream client from configuration.
    pub fn from_config(
        config: &ProxyConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, PlatformError> {
        let authenticator = SessionAuthenticator::new(
            CredentialResolver::new(credentials),
            TokenSigner::new(config.signing_secret.as_bytes(), config.session_ttl),
        );
        let platform = PlatformClient::new(&config.upstream_base_url, config.upstream_timeout)?;

        Ok(Self::new(authenticator, platform))
    }
}
