//! Declarative keyword table for row classification.

use crate::schema::RuleKey;

/// Column holding the human-readable rule description.
pub const DESCRIPTION_COLUMN: usize = 2;

/// Keywords marking a row as a textual policy (fed to prompt generation).
pub const POLICY_KEYWORDS: &[&str] = &["compliance", "safety", "hierarchy"];

/// Maps a conjunction of keyword groups to a numeric rule key.
///
/// A row matches when, for every group, at least one keyword of that group
/// occurs in the lower-cased row text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub key: RuleKey,
    pub groups: &'static [&'static [&'static str]],
}

impl KeywordRule {
    pub fn matches(&self, haystack: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|kw| haystack.contains(kw)))
    }
}

/// Tried in order; the first matching entry wins.
///
/// "tap target" / "touch target" cover tap-target wording ("Button min tap
/// target"); a bare "target" does not count as a size.
pub const NUMERIC_RULES: &[KeywordRule] = &[
    KeywordRule {
        key: RuleKey::MinButtonHeight,
        groups: &[&["button"], &["height", "size", "tap target", "touch target"]],
    },
    KeywordRule {
        key: RuleKey::MinFieldHeight,
        groups: &[&["field", "input"], &["height"]],
    },
    KeywordRule {
        key: RuleKey::MaxMisalignment,
        groups: &[&["align"]],
    },
];

/// First rule in `table` matching `haystack`.
pub(super) fn classify(table: &[KeywordRule], haystack: &str) -> Option<RuleKey> {
    table
        .iter()
        .find(|rule| rule.matches(haystack))
        .map(|rule| rule.key)
}

pub(super) fn mentions_any(keywords: &[&str], haystack: &str) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}
