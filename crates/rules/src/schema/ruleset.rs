//! Parsed rule set: numeric thresholds plus textual policies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::key::RuleKey;

/// Pixel limits keyed by [`RuleKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thresholds(BTreeMap<RuleKey, u32>);

impl Thresholds {
    /// Fallback limits used when a sheet yields no numeric rules.
    pub fn defaults() -> Self {
        Self(BTreeMap::from([
            (RuleKey::MinButtonHeight, 44),
            (RuleKey::MinFieldHeight, 40),
            (RuleKey::MaxMisalignment, 4),
        ]))
    }

    pub fn get(&self, key: RuleKey) -> Option<u32> {
        self.0.get(&key).copied()
    }

    /// Set a limit, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: RuleKey, value: u32) -> Option<u32> {
        self.0.insert(key, value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(RuleKey, u32)> for Thresholds {
    fn from_iter<I: IntoIterator<Item = (RuleKey, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Thresholds and policy text derived from one profile's rule sheet.
///
/// `numeric_thresholds` is either entirely parsed from the sheet or entirely
/// equal to `defaults`; the two are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub numeric_thresholds: Thresholds,
    /// Free-text policy statements in source row order.
    pub textual_policies: Vec<String>,
    pub defaults: Thresholds,
}

impl RuleSet {
    /// Rule set built purely from defaults, with no policies.
    pub fn defaults_only() -> Self {
        Self {
            numeric_thresholds: Thresholds::defaults(),
            textual_policies: Vec::new(),
            defaults: Thresholds::defaults(),
        }
    }

    /// Limit for `key`, falling back to the default when the sheet did not set it.
    pub fn get(&self, key: RuleKey) -> u32 {
        self.numeric_thresholds
            .get(key)
            .or_else(|| self.defaults.get(key))
            .unwrap_or_default()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults_only()
    }
}
