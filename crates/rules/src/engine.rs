//! [`RuleEngine`]: profile name → sheet → parsed [`RuleSet`].
//!
//! Never fails. A missing or unreadable sheet degrades to the default
//! thresholds and is reported through [`LoadStatus::Degraded`] plus a
//! `warn!` log line.

use serde::Serialize;
use tracing::{info, warn};

use crate::parser::{ParseDiagnostic, RuleParser};
use crate::profile::{ProfileResolution, ProfileResolver};
use crate::schema::{RuleKey, RuleSet};
use crate::source::SheetSource;

/// How the rule set was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Thresholds came from the sheet.
    Clean,
    /// Sheet parsed, but it had no numeric rules; defaults substituted.
    Defaulted,
    /// Sheet could not be loaded; defaults and no policies.
    Degraded { reason: String },
}

/// Result of [`RuleEngine::load_rules`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedRules {
    pub profile: ProfileResolution,
    pub rule_set: RuleSet,
    pub status: LoadStatus,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl LoadedRules {
    /// Geometry limit for `key` (detector-facing accessor).
    pub fn get(&self, key: RuleKey) -> u32 {
        self.rule_set.get(key)
    }

    pub fn sheet_id(&self) -> &str {
        self.profile.sheet_id
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, LoadStatus::Degraded { .. })
    }
}

/// Ties a [`ProfileResolver`], a [`SheetSource`] and a [`RuleParser`] together.
pub struct RuleEngine<S> {
    source: S,
    resolver: ProfileResolver,
    parser: RuleParser,
}

impl<S: SheetSource> RuleEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_parser(source, RuleParser::new())
    }

    pub fn with_parser(source: S, parser: RuleParser) -> Self {
        Self {
            source,
            resolver: ProfileResolver::new(),
            parser,
        }
    }

    /// Resolve `profile_name`, load its sheet and parse it.
    pub fn load_rules(&self, profile_name: &str) -> LoadedRules {
        let profile = self.resolver.resolve(profile_name);

        let rows = match self.source.sheet(profile.sheet_id) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(profile = %profile_name, sheet = profile.sheet_id, error = %e, "rule source unavailable, running in degraded mode with default thresholds");
                return LoadedRules {
                    profile,
                    rule_set: RuleSet::defaults_only(),
                    status: LoadStatus::Degraded {
                        reason: e.to_string(),
                    },
                    diagnostics: Vec::new(),
                };
            }
        };

        let report = self.parser.parse(&rows);
        for diagnostic in &report.diagnostics {
            warn!(sheet = profile.sheet_id, ?diagnostic, "rule sheet cell skipped");
        }

        let status = if report.used_defaults {
            info!(sheet = profile.sheet_id, policies = report.rule_set.textual_policies.len(), "no pixel dimensions found, using default thresholds");
            LoadStatus::Defaulted
        } else {
            info!(sheet = profile.sheet_id, thresholds = ?report.rule_set.numeric_thresholds, policies = report.rule_set.textual_policies.len(), "loaded rule thresholds");
            LoadStatus::Clean
        };

        LoadedRules {
            profile,
            rule_set: report.rule_set,
            status,
            diagnostics: report.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cell, Sheet, Thresholds};
    use crate::source::{Workbook, WorkbookFile};

    fn workbook() -> Workbook {
        let mut wb = Workbook::new();
        wb.insert_sheet(Sheet {
            name: "Healthcare".into(),
            rows: vec![
                vec![Cell::from("Button min tap target"), Cell::Empty, Cell::from("44px minimum")],
                vec![Cell::from("Button height guideline"), Cell::Empty, Cell::from("48px recommended")],
                vec![Cell::from("HIPAA"), Cell::from("Compliance"), Cell::from("Mask patient identifiers")],
            ],
        })
        .insert_sheet(Sheet {
            name: "Enterprise".into(),
            rows: vec![vec![Cell::from("SSO"), Cell::from("Compliance"), Cell::from("Show tenant name")]],
        })
        .insert_sheet(Sheet {
            name: "Universal Rules".into(),
            rows: vec![],
        });
        wb
    }

    #[test]
    fn clean_load_uses_sheet_values() {
        let engine = RuleEngine::new(workbook());
        let loaded = engine.load_rules("HEALTHCARE");
        assert_eq!(loaded.status, LoadStatus::Clean);
        assert_eq!(loaded.sheet_id(), "Healthcare");
        assert_eq!(loaded.get(RuleKey::MinButtonHeight), 48);
        assert_eq!(loaded.get(RuleKey::MinFieldHeight), 40);
        assert_eq!(loaded.rule_set.textual_policies, vec!["Mask patient identifiers"]);
    }

    #[test]
    fn text_only_sheet_is_defaulted() {
        let loaded = RuleEngine::new(workbook()).load_rules("b2b");
        assert_eq!(loaded.status, LoadStatus::Defaulted);
        assert_eq!(loaded.rule_set.numeric_thresholds, Thresholds::defaults());
        assert_eq!(loaded.rule_set.textual_policies.len(), 1);
    }

    #[test]
    fn empty_sheet_for_unknown_profile_equals_defaults() {
        let loaded = RuleEngine::new(workbook()).load_rules("vaporwave");
        assert!(loaded.profile.is_fallback());
        assert_eq!(loaded.sheet_id(), "Universal Rules");
        assert_eq!(loaded.rule_set, RuleSet::defaults_only());
    }

    #[test]
    fn missing_sheet_degrades_to_defaults() {
        let loaded = RuleEngine::new(workbook()).load_rules("gaming");
        assert!(loaded.is_degraded());
        assert_eq!(loaded.rule_set, RuleSet::defaults_only());
    }

    #[test]
    fn missing_workbook_file_degrades_to_defaults() {
        let dir = tempfile::TempDir::new().expect("create tempdir");
        let engine = RuleEngine::new(WorkbookFile::new(dir.path().join("absent.yml")));
        let loaded = engine.load_rules("healthcare");
        match &loaded.status {
            LoadStatus::Degraded { reason } => assert!(reason.contains("absent.yml")),
            other => panic!("expected degraded, got {:?}", other),
        }
        assert!(loaded.rule_set.textual_policies.is_empty());
    }

    #[test]
    fn engine_accepts_borrowed_source() {
        let wb = workbook();
        let engine = RuleEngine::new(&wb);
        assert_eq!(engine.load_rules("healthcare").get(RuleKey::MinButtonHeight), 48);
    }
}
