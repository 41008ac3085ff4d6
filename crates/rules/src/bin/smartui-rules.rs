//! smartui-rules — inspect rule sheets and record reviewer feedback.
//!
//! Usage:
//!   cargo run --bin smartui-rules -- resolve ios
//!   cargo run --bin smartui-rules -- rules --profile healthcare
//!   cargo run --bin smartui-rules -- flag --profile healthcare --rule min_button_height
//!   cargo run --bin smartui-rules -- feedback --profile healthcare --rule min_button_height reject
//!   cargo run --bin smartui-rules -- config

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use smartui_core::Config;
use smartui_rules::{Feedback, FeedbackPolicy, JsonFileBackend, ProfileResolver, RuleEngine, SheetSource, WorkbookFile};

// ── CLI ─────────────────────────────────────────────────────────────

/// Compliance-rule engine for UI audits.
#[derive(Parser, Debug)]
#[command(name = "smartui-rules", version, about)]
struct Cli {
    /// Rule workbook (YAML or JSON). Overrides `SMARTUI_RULES_FILE`.
    #[arg(long)]
    rules_file: Option<PathBuf>,

    /// Persisted strictness weights (JSON). Overrides `SMARTUI_WEIGHTS_FILE`.
    #[arg(long)]
    weights_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which sheet a profile name maps to.
    Resolve { profile: String },
    /// Print thresholds and policies for a profile as JSON.
    Rules {
        #[arg(long)]
        profile: Option<String>,
    },
    /// List sheets in the rule workbook.
    Sheets,
    /// Decide whether a violation of a rule should be surfaced.
    Flag {
        #[arg(long)]
        profile: String,
        #[arg(long)]
        rule: String,
    },
    /// Record reviewer feedback: accept (+1) or reject (-1).
    Feedback {
        #[arg(long)]
        profile: String,
        #[arg(long)]
        rule: String,
        #[arg(allow_hyphen_values = true)]
        verdict: Feedback,
    },
    /// Dump all stored weights as JSON.
    Weights,
    /// Print the resolved configuration as JSON.
    Config,
}

/// Files the command operates on.
#[derive(Debug, PartialEq, Eq)]
struct Paths {
    rules_file: PathBuf,
    weights_file: PathBuf,
}

/// Explicit flags win; otherwise the (profiled) env config decides.
fn resolve_paths(cli: &Cli, config: &Config) -> Paths {
    Paths {
        rules_file: cli.rules_file.clone().unwrap_or_else(|| config.rules.rules_file.clone()),
        weights_file: cli.weights_file.clone().unwrap_or_else(|| config.feedback.weights_file.clone()),
    }
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    smartui_core::load_dotenv();
    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    let Paths { rules_file, weights_file } = resolve_paths(&cli, &config);
    info!(rules_file = %rules_file.display(), weights_file = %weights_file.display(), "resolved files");

    match cli.command {
        Command::Resolve { profile } => {
            let resolution = ProfileResolver::new().resolve(&profile);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        Command::Rules { profile } => {
            let profile = profile.unwrap_or_else(|| config.rules.default_design_profile.clone());
            let engine = RuleEngine::new(WorkbookFile::new(&rules_file));
            let loaded = engine.load_rules(&profile);
            println!("{}", serde_json::to_string_pretty(&loaded)?);
        }
        Command::Sheets => {
            for name in WorkbookFile::new(&rules_file).sheet_names() {
                println!("{}", name);
            }
        }
        Command::Flag { profile, rule } => {
            let policy = open_policy(&weights_file)?;
            let flagged = policy.should_flag_violation(&profile, &rule);
            println!(
                "{}",
                serde_json::json!({
                    "profile": profile,
                    "rule": rule,
                    "weight": policy.get_weight(&profile, &rule),
                    "flag": flagged,
                })
            );
        }
        Command::Feedback { profile, rule, verdict } => {
            let policy = open_policy(&weights_file)?;
            let update = policy
                .update_policy(&profile, &rule, verdict)
                .with_context(|| format!("failed to record feedback in {}", weights_file.display()))?;
            println!("{}", update);
        }
        Command::Weights => {
            let policy = open_policy(&weights_file)?;
            println!("{}", serde_json::to_string_pretty(&policy.weights())?);
        }
        Command::Config => {
            let mut summary = config.summary();
            summary["rules"]["rules_file"] = serde_json::json!(rules_file);
            summary["feedback"]["weights_file"] = serde_json::json!(weights_file);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn open_policy(weights_file: &Path) -> Result<FeedbackPolicy<JsonFileBackend>> {
    info!(path = %weights_file.display(), "opening weight store");
    FeedbackPolicy::new(JsonFileBackend::new(weights_file))
        .with_context(|| format!("failed to load weight store: {}", weights_file.display()))
}
