use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

pub const DEFAULT_RULES_FILE: &str = "data/ui_rule_sets.yml";
pub const DEFAULT_WEIGHTS_FILE: &str = "data/rl_memory.json";
pub const DEFAULT_DESIGN_PROFILE: &str = "universal";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active env profile name (empty = default). Not to be confused with
    /// the design profile, which selects a rule sheet.
    pub profile: String,
    pub rules: RulesConfig,
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SMARTUI_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SMARTUI_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: RulesConfig::from_env_profiled(p),
            feedback: FeedbackConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:       file={}, design_profile={}", self.rules.rules_file.display(), self.rules.default_design_profile);
        tracing::info!("  feedback:    weights_file={}", self.feedback.weights_file.display());
    }

    /// JSON view of the resolved config, printed by `smartui-rules config`.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "rules": {
                "rules_file": self.rules.rules_file,
                "default_design_profile": self.rules.default_design_profile,
            },
            "feedback": { "weights_file": self.feedback.weights_file },
        })
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Multi-sheet rule workbook (YAML or JSON).
    pub rules_file: PathBuf,
    /// Design profile used when the caller does not name one.
    pub default_design_profile: String,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            rules_file: PathBuf::from(profiled_env_or(p, "SMARTUI_RULES_FILE", DEFAULT_RULES_FILE)),
            default_design_profile: profiled_env_or(
                p,
                "SMARTUI_DEFAULT_DESIGN_PROFILE",
                DEFAULT_DESIGN_PROFILE,
            ),
        }
    }
}

// ── Feedback ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Flat JSON map of `{profile}_{rule}` → strictness weight.
    pub weights_file: PathBuf,
}

impl FeedbackConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            weights_file: PathBuf::from(profiled_env_or(p, "SMARTUI_WEIGHTS_FILE", DEFAULT_WEIGHTS_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; each test uses its own profile prefix
    // so they can run in parallel without stepping on each other.

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::for_profile("CFGTEST_EMPTY");
        assert_eq!(cfg.profile, "CFGTEST_EMPTY");
        if env::var("SMARTUI_RULES_FILE").is_err() {
            assert_eq!(cfg.rules.rules_file, PathBuf::from(DEFAULT_RULES_FILE));
        }
        if env::var("SMARTUI_WEIGHTS_FILE").is_err() {
            assert_eq!(cfg.feedback.weights_file, PathBuf::from(DEFAULT_WEIGHTS_FILE));
        }
    }

    #[test]
    fn profiled_key_wins_over_plain_key() {
        env::set_var("CFGTEST_PREFIXED_SMARTUI_WEIGHTS_FILE", "/tmp/prefixed.json");
        let cfg = Config::for_profile("cfgtest_prefixed");
        assert_eq!(cfg.profile, "CFGTEST_PREFIXED");
        assert_eq!(cfg.feedback.weights_file, PathBuf::from("/tmp/prefixed.json"));
        env::remove_var("CFGTEST_PREFIXED_SMARTUI_WEIGHTS_FILE");
    }

    #[test]
    fn empty_profiled_value_is_ignored() {
        env::set_var("CFGTEST_BLANK_SMARTUI_DEFAULT_DESIGN_PROFILE", "");
        let cfg = Config::for_profile("CFGTEST_BLANK");
        let expected = env::var("SMARTUI_DEFAULT_DESIGN_PROFILE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DESIGN_PROFILE.to_string());
        assert_eq!(cfg.rules.default_design_profile, expected);
        env::remove_var("CFGTEST_BLANK_SMARTUI_DEFAULT_DESIGN_PROFILE");
    }

    #[test]
    fn profile_label_defaults() {
        let cfg = Config::for_profile("");
        assert_eq!(cfg.profile_label(), "default");
        assert_eq!(cfg.summary()["profile"], "default");
    }
}
