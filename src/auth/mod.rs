// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session tokens for callers of the proxy.
//!
//! ## Auth Flow
//!
//! 1. The xApp frontend calls `GET /xapp/ott/{token}` with `x-api-key: <tenant>`
//! 2. The proxy:
//!    - resolves the tenant's upstream credentials (403 if unknown)
//!    - validates the one-time token shape
//!    - redeems it upstream with the tenant's `X-API-Key` / `X-API-Secret`
//!    - returns the upstream payload plus a `token` (HS256, 4 h)
//! 3. Subsequent calls send `Authorization: Bearer <token>`
//! 4. The proxy verifies signature and expiry, then re-resolves the `app`
//!    claim against configuration before forwarding
//!
//! ## Security
//!
//! - Tokens carry the tenant identifier only, never upstream secrets
//! - Removing `XAPP_<tenant>` from configuration revokes every token for it
//! - Clock skew tolerance is 60 seconds

pub mod authenticator;
pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod token;

pub use authenticator::{strip_bearer_prefix, SessionAuthenticator, TOKEN_FIELD};
pub use claims::SessionClaims;
pub use context::RequestContext;
pub use error::AuthError;
pub use extractor::{ApiKeyHeader, Bearer, API_KEY_HEADER};
pub use token::{TokenError, TokenSigner};
