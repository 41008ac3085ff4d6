//! Design-profile name → rule-sheet identifier resolution.
//!
//! Names are matched case-insensitively against a fixed alias table.
//! Unknown or empty names resolve to the universal sheet and carry a
//! [`ProfileStatus::Fallback`] tag so callers can tell the two apart.

use serde::Serialize;
use tracing::debug;

/// Sheet used for any name missing from the alias table.
pub const UNIVERSAL_SHEET: &str = "Universal Rules";

const SHEET_ALIASES: &[(&str, &str)] = &[
    ("apple", "Apple HIG"),
    ("ios", "Apple HIG"),
    ("google", "Google Material Design"),
    ("material", "Google Material Design"),
    ("android", "Android"),
    ("microsoft", "Microsoft Fluent"),
    ("fluent", "Microsoft Fluent"),
    ("healthcare", "Healthcare"),
    ("ecommerce", "E-commerce"),
    ("gaming", "Gaming"),
    ("enterprise", "Enterprise"),
    ("b2b", "Enterprise"),
    ("web", "Web Standards"),
    ("universal", UNIVERSAL_SHEET),
    ("all", "All Rules"),
    ("overview", "Overview"),
];

/// Whether the name was found in the alias table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileStatus {
    Matched,
    Fallback { reason: String },
}

/// Outcome of resolving a profile name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResolution {
    pub sheet_id: &'static str,
    #[serde(flatten)]
    pub status: ProfileStatus,
}

impl ProfileResolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, ProfileStatus::Fallback { .. })
    }
}

/// Stateless lookup over the alias table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileResolver;

impl ProfileResolver {
    pub fn new() -> Self {
        Self
    }

    /// Map a user-supplied profile name to a sheet identifier. Never fails.
    pub fn resolve(&self, profile_name: &str) -> ProfileResolution {
        let needle = profile_name.trim().to_lowercase();

        if let Some((_, sheet)) = SHEET_ALIASES.iter().find(|(alias, _)| *alias == needle) {
            return ProfileResolution {
                sheet_id: *sheet,
                status: ProfileStatus::Matched,
            };
        }

        let reason = if needle.is_empty() {
            "empty profile name".to_string()
        } else {
            format!("unknown profile '{}'", profile_name.trim())
        };
        debug!(profile = %profile_name, sheet = UNIVERSAL_SHEET, %reason, "profile fell back to universal sheet");
        ProfileResolution {
            sheet_id: UNIVERSAL_SHEET,
            status: ProfileStatus::Fallback { reason },
        }
    }

    /// All recognised aliases, in table order.
    pub fn known_aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        SHEET_ALIASES.iter().copied()
    }
}
