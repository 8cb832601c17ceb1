// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! XApp Proxy - Authenticating forwarder for the xApp platform API
//!
//! Callers redeem a one-time token once with their tenant `x-api-key`, receive
//! a short-lived bearer token, and use it for a fixed set of forwarded
//! endpoints. The proxy injects the tenant's upstream `X-API-Key` /
//! `X-API-Secret` on every forwarded call.
//!
//! ## Modules
//!
//! - `api` - HTTP routes (Axum)
//! - `auth` - One-time-token exchange and bearer verification
//! - `tenant` - Tenant identifiers and credential resolution
//! - `providers` - Upstream platform transport

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod providers;
pub mod state;
pub mod tenant;
