// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tenant identifier parsing.

use std::fmt;

use uuid::{Uuid, Variant};

/// Prefix of every per-tenant configuration name.
pub const LOOKUP_KEY_PREFIX: &str = "XAPP_";

/// Length of the hyphenated textual form (`8-4-4-4-12`).
const TEXTUAL_LEN: usize = 36;

/// Byte offsets of the group separators in the textual form.
const SEPARATOR_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A validated tenant identifier.
///
/// Keeps the caller's trimmed spelling (case preserved) alongside the parsed
/// UUID. The spelling is what gets sent upstream as `X-API-Key`; the UUID is
/// what the [`TenantDirectory`](super::TenantDirectory) is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId {
    raw: String,
    uuid: Uuid,
}

impl TenantId {
    /// Parse a tenant identifier, returning `None` unless the trimmed input
    /// is exactly a hyphenated UUID v4.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let uuid = parse_uuid_v4(trimmed, b'-')?;
        Some(Self {
            raw: trimmed.to_string(),
            uuid,
        })
    }

    /// The identifier as supplied by the caller (trimmed, case preserved).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Configuration name holding this tenant's upstream secret.
    pub fn lookup_key(&self) -> String {
        format!(
            "{LOOKUP_KEY_PREFIX}{}",
            self.raw.to_ascii_uppercase().replace('-', "_")
        )
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether `value` has the exact hyphenated UUID v4 shape (no trimming).
pub fn is_uuid_v4(value: &str) -> bool {
    parse_uuid_v4(value, b'-').is_some()
}

/// Parse the upper-snake suffix of a configuration name
/// (`6BA7B810_9DAD_41D1_80B4_00C04FD430C8`) back into a UUID v4.
pub(crate) fn parse_snake_uuid_v4(value: &str) -> Option<Uuid> {
    parse_uuid_v4(value, b'_')
}

fn parse_uuid_v4(value: &str, separator: u8) -> Option<Uuid> {
    if !has_grouped_hex_shape(value.as_bytes(), separator) {
        return None;
    }

    // The shape check pins the layout; hand the hyphenated form to `uuid` for
    // the version and variant nibbles.
    let hyphenated = value.replace(separator as char, "-");
    let uuid = Uuid::try_parse(&hyphenated).ok()?;

    if uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122 {
        Some(uuid)
    } else {
        None
    }
}

fn has_grouped_hex_shape(bytes: &[u8], separator: u8) -> bool {
    bytes.len() == TEXTUAL_LEN
        && bytes.iter().enumerate().all(|(index, byte)| {
            if SEPARATOR_POSITIONS.contains(&index) {
                *byte == separator
            } else {
                byte.is_ascii_hexdigit()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_v4_in_any_case() {
        assert!(is_uuid_v4("3F2504E0-4F89-41D3-9A0C-0305E82C3301"));
        assert!(is_uuid_v4("3f2504e0-4f89-41d3-9a0c-0305e82c3301"));
        assert!(is_uuid_v4("6ba7b810-9DAD-41d1-B0b4-00c04fd430c8"));
    }

    #[test]
    fn rejects_other_versions_and_variants() {
        // version 1
        assert!(!is_uuid_v4("6BA7B810-9DAD-11D1-80B4-00C04FD430C8"));
        // variant nibble outside {8,9,A,B}
        assert!(!is_uuid_v4("3F2504E0-4F89-41D3-CA0C-0305E82C3301"));
        assert!(!is_uuid_v4("3F2504E0-4F89-41D3-7A0C-0305E82C3301"));
    }

    #[test]
    fn rejects_non_hyphenated_forms() {
        assert!(!is_uuid_v4("3F2504E04F8941D39A0C0305E82C3301"));
        assert!(!is_uuid_v4("{3F2504E0-4F89-41D3-9A0C-0305E82C3301}"));
        assert!(!is_uuid_v4("urn:uuid:3F2504E0-4F89-41D3-9A0C-0305E82C3301"));
        assert!(!is_uuid_v4("3F2504E0_4F89_41D3_9A0C_0305E82C3301"));
        assert!(!is_uuid_v4("3F2504E0-4F89-41D3-9A0C-0305E82C330G"));
        assert!(!is_uuid_v4(""));
        assert!(!is_uuid_v4("not-a-uuid"));
    }

    #[test]
    fn shape_check_does_not_trim() {
        assert!(!is_uuid_v4(" 3F2504E0-4F89-41D3-9A0C-0305E82C3301"));
    }

    #[test]
    fn parse_trims_and_preserves_case() {
        let id = TenantId::parse("  6ba7b810-9DAD-41d1-80b4-00c04fd430c8\n").unwrap();
        assert_eq!(id.as_str(), "6ba7b810-9DAD-41d1-80b4-00c04fd430c8");
        assert_eq!(id.to_string(), "6ba7b810-9DAD-41d1-80b4-00c04fd430c8");
    }

    #[test]
    fn lookup_key_is_upper_snake_with_prefix() {
        let id = TenantId::parse("6ba7b810-9dad-41d1-80b4-00c04fd430c8").unwrap();
        assert_eq!(id.lookup_key(), "XAPP_6BA7B810_9DAD_41D1_80B4_00C04FD430C8");
    }

    #[test]
    fn differently_cased_spellings_share_a_uuid() {
        let lower = TenantId::parse("6ba7b810-9dad-41d1-80b4-00c04fd430c8").unwrap();
        let upper = TenantId::parse("6BA7B810-9DAD-41D1-80B4-00C04FD430C8").unwrap();
        assert_ne!(lower, upper);
        assert_eq!(lower.uuid(), upper.uuid());
    }

    #[test]
    fn snake_suffix_round_trips_to_uuid() {
        let uuid = parse_snake_uuid_v4("6BA7B810_9DAD_41D1_80B4_00C04FD430C8").unwrap();
        assert_eq!(uuid.to_string(), "6ba7b810-9dad-41d1-80b4-00c04fd430c8");
        assert!(parse_snake_uuid_v4("6BA7B810-9DAD-41D1-80B4-00C04FD430C8").is_none());
        assert!(parse_snake_uuid_v4("SECRET").is_none());
    }
}
