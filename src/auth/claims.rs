// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::tenant::TenantId;

/// Claims carried by every token this proxy mints.
///
/// The token binds a caller to a tenant *identifier* only. Upstream
/// credentials are never embedded; they are re-resolved on every use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// One-time token redeemed to obtain this session, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ott: Option<String>,

    /// Tenant identifier (UUID v4, as supplied in `x-api-key`)
    pub app: String,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiration (seconds since epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// `None` when `issued_at + ttl` is not a representable instant.
    pub fn new(
        tenant: &TenantId,
        ott: Option<&str>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;
        Some(Self {
            ott: ott.map(str::to_string),
            app: tenant.as_str().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
