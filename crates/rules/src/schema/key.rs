//! Closed set of numeric rule keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric measurement categories a rule sheet can set a pixel limit for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKey {
    MinButtonHeight,
    MinFieldHeight,
    MaxMisalignment,
}

impl RuleKey {
    /// Every key, in declaration order.
    pub const ALL: [RuleKey; 3] = [
        RuleKey::MinButtonHeight,
        RuleKey::MinFieldHeight,
        RuleKey::MaxMisalignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKey::MinButtonHeight => "min_button_height",
            RuleKey::MinFieldHeight => "min_field_height",
            RuleKey::MaxMisalignment => "max_misalignment",
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "min_button_height" => Ok(RuleKey::MinButtonHeight),
            "min_field_height" => Ok(RuleKey::MinFieldHeight),
            "max_misalignment" => Ok(RuleKey::MaxMisalignment),
            other => Err(format!("unknown rule key: '{}'", other)),
        }
    }
}
