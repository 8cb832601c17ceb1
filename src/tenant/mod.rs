// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Tenant Credentials
//!
//! Maps a caller-supplied tenant identifier (the `x-api-key` header, or the
//! `app` claim of a session token) to the upstream credential pair that the
//! proxy injects into forwarded calls.
//!
//! ## Lookup
//!
//! 1. The identifier is trimmed and must have the UUID v4 textual shape
//!    (`8-4-4-4-12` hex, version nibble `4`, variant nibble in `{8,9,A,B}`).
//! 2. Configuration names are derived as `XAPP_` + upper-snake identifier,
//!    e.g. `XAPP_6BA7B810_9DAD_41D1_80B4_00C04FD430C8`.
//! 3. The [`TenantDirectory`] is scanned from the environment once at startup
//!    and keyed by the parsed UUID, so runtime lookups never build config names.
//!    Only names spelled exactly as the derived key are loaded.
//!
//! An unknown tenant is an expected outcome (`None`), never an error.

pub mod directory;
pub mod identifier;
pub mod resolver;

pub use directory::{CredentialSource, TenantDirectory};
pub use identifier::{is_uuid_v4, TenantId, LOOKUP_KEY_PREFIX};
pub use resolver::{CredentialPair, CredentialResolver};
