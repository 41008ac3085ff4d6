//! Integration tests that run the engine against the sample workbook in
//! `data/ui_rule_sets.yml`.

use smartui_rules::{LoadStatus, ProfileResolver, RuleEngine, RuleKey, RuleSet, SheetSource, Thresholds, WorkbookFile};

/// Resolve the sample workbook relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn workbook_path() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data/ui_rule_sets.yml")
}

fn engine() -> RuleEngine<WorkbookFile> {
    RuleEngine::new(WorkbookFile::new(workbook_path()))
}

#[test]
fn every_alias_has_a_sheet() {
    let source = WorkbookFile::new(workbook_path());
    let sheets = source.sheet_names();
    for (alias, sheet) in ProfileResolver::new().known_aliases() {
        assert!(sheets.iter().any(|s| s == sheet), "alias '{}' maps to missing sheet '{}'", alias, sheet);
    }
}

#[test]
fn healthcare_sheet() {
    let loaded = engine().load_rules("Healthcare");
    assert_eq!(loaded.status, LoadStatus::Clean);
    assert!(loaded.diagnostics.is_empty());

    // Second button row wins over the first.
    assert_eq!(loaded.get(RuleKey::MinButtonHeight), 48);
    assert_eq!(loaded.get(RuleKey::MinFieldHeight), 44);
    // Not set by the sheet; accessor answers from defaults.
    assert_eq!(loaded.rule_set.numeric_thresholds.get(RuleKey::MaxMisalignment), None);
    assert_eq!(loaded.get(RuleKey::MaxMisalignment), 4);

    assert_eq!(
        loaded.rule_set.textual_policies,
        vec![
            "Mask patient identifiers on shared screens",
            "Critical alerts must never rely on colour alone",
        ]
    );
}

#[test]
fn apple_aliases_agree() {
    let engine = engine();
    let ios = engine.load_rules("ios");
    let apple = engine.load_rules("APPLE");
    assert_eq!(ios.rule_set, apple.rule_set);
    assert_eq!(ios.get(RuleKey::MinButtonHeight), 44);
    assert_eq!(ios.get(RuleKey::MinFieldHeight), 44);
    assert_eq!(ios.get(RuleKey::MaxMisalignment), 2);
    assert_eq!(ios.rule_set.textual_policies, vec!["Large titles anchor each screen"]);
}

#[test]
fn material_and_web_sheets() {
    let engine = engine();
    let material = engine.load_rules("material");
    assert_eq!(material.get(RuleKey::MinButtonHeight), 48);
    assert_eq!(material.get(RuleKey::MinFieldHeight), 56);
    assert_eq!(material.get(RuleKey::MaxMisalignment), 4);

    let web = engine.load_rules("web");
    assert_eq!(web.get(RuleKey::MinButtonHeight), 24);
    assert_eq!(web.get(RuleKey::MinFieldHeight), 40);
    assert_eq!(web.get(RuleKey::MaxMisalignment), 4);
}

#[test]
fn policy_only_sheet_uses_defaults() {
    let loaded = engine().load_rules("b2b");
    assert_eq!(loaded.sheet_id(), "Enterprise");
    assert_eq!(loaded.status, LoadStatus::Defaulted);
    assert_eq!(loaded.rule_set.numeric_thresholds, Thresholds::defaults());
    assert_eq!(loaded.rule_set.textual_policies.len(), 2);
}

#[test]
fn unknown_profile_gets_empty_universal_sheet() {
    let loaded = engine().load_rules("memphis-design");
    assert!(loaded.profile.is_fallback());
    assert_eq!(loaded.sheet_id(), "Universal Rules");
    assert_eq!(loaded.status, LoadStatus::Defaulted);
    assert_eq!(loaded.rule_set, RuleSet::defaults_only());
}

#[test]
fn loading_twice_is_identical() {
    let engine = engine();
    assert_eq!(engine.load_rules("gaming"), engine.load_rules("gaming"));
}
