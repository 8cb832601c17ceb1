// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-tenant secret directory.

use std::{collections::HashMap, env, fmt};

use uuid::Uuid;

use super::identifier::{parse_snake_uuid_v4, TenantId, LOOKUP_KEY_PREFIX};

/// Read-only provider of upstream secrets, injected into the
/// [`CredentialResolver`](super::CredentialResolver).
pub trait CredentialSource: Send + Sync {
    /// The configured upstream secret for `tenant`, if any.
    fn secret(&self, tenant: &TenantId) -> Option<&str>;
}

/// Snapshot of every `XAPP_<UUID_V4_UPPER_SNAKE>` configuration entry.
///
/// Built once at startup. Only the exact derived key spelling counts: names
/// that do not match it (including `XAPP_SECRET` and lowercase hex) and
/// entries with blank values are skipped. Values are stored as configured.
#[derive(Clone, Default)]
pub struct TenantDirectory {
    secrets: HashMap<Uuid, String>,
}

impl TenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::vars_os()
                .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?))),
        )
    }

    /// Scan arbitrary `(name, value)` configuration pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut directory = Self::new();
        for (name, value) in vars {
            let Some(uuid) = tenant_uuid_from_name(name.as_ref()) else {
                continue;
            };
            let secret = value.as_ref();
            if !secret.trim().is_empty() {
                directory.secrets.insert(uuid, secret.to_string());
            }
        }
        directory
    }

    /// Add or replace a tenant entry.
    pub fn with_tenant(mut self, tenant: &TenantId, secret: impl Into<String>) -> Self {
        self.secrets.insert(tenant.uuid(), secret.into());
        self
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl CredentialSource for TenantDirectory {
    fn secret(&self, tenant: &TenantId) -> Option<&str> {
        self.secrets.get(&tenant.uuid()).map(String::as_str)
    }
}

impl fmt::Debug for TenantDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantDirectory")
            .field("tenants", &self.secrets.len())
            .finish()
    }
}

fn tenant_uuid_from_name(name: &str) -> Option<Uuid> {
    let suffix = name.strip_prefix(LOOKUP_KEY_PREFIX)?;
    if suffix.bytes().any(|b| b.is_ascii_lowercase()) {
        return None;
    }
    parse_snake_uuid_v4(suffix)
}
