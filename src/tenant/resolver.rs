// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential resolution.

use std::{fmt, sync::Arc};

use super::{directory::CredentialSource, identifier::TenantId};

/// Upstream header carrying the tenant key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Upstream header carrying the tenant secret.
pub const API_SECRET_HEADER: &str = "X-API-Secret";

/// The upstream-facing key/secret used to authenticate forwarded calls.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    /// The tenant identifier exactly as supplied (trimmed, case preserved).
    pub key: String,
    pub secret: String,
}

impl CredentialPair {
    /// Header name/value pairs to attach to an upstream request.
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            (API_KEY_HEADER, self.key.as_str()),
            (API_SECRET_HEADER, self.secret.as_str()),
        ]
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Maps tenant identifiers to [`CredentialPair`]s.
///
/// Pure over its [`CredentialSource`]; cheap to clone.
#[derive(Clone)]
pub struct CredentialResolver {
    source: Arc<dyn CredentialSource>,
}

impl CredentialResolver {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }

    /// Resolve a raw identifier. `None` means the caller is unauthorized:
    /// either the identifier is not a UUID v4 or no secret is configured.
    pub fn resolve(&self, identifier: &str) -> Option<CredentialPair> {
        let tenant = TenantId::parse(identifier)?;
        self.resolve_tenant(&tenant)
    }

    pub fn resolve_tenant(&self, tenant: &TenantId) -> Option<CredentialPair> {
        let secret = self.source.secret(tenant)?;
        Some(CredentialPair {
            key: tenant.as_str().to_string(),
            secret: secret.to_string(),
        })
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}
