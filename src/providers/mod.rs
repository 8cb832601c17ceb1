// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Upstream platform integrations.

pub mod platform;

pub use platform::{PlatformClient, PlatformError};
