// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::tenant::{CredentialPair, TenantId};

/// Per-request authorization result. Lives for one request/forward cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant: TenantId,
    pub credentials: CredentialPair,
    /// One-time token the session was minted from, when the token carried one.
    pub ott: Option<String>,
}

impl RequestContext {
    /// Headers to inject into the forwarded upstream call.
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        self.credentials.headers()
    }
}
