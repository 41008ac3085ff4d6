//! Compliance-rule engine for UI audits.
//!
//! This crate provides:
//! - Profile name → rule sheet resolution with explicit fallback reporting
//! - Keyword-table parsing of header-less rule sheets into pixel thresholds
//!   and textual policies, with default substitution
//! - YAML/JSON multi-sheet workbooks as rule sources
//! - A persisted, feedback-trained strictness weight per (profile, rule)
//!   that gates whether a detected violation is surfaced

pub mod engine;
pub mod error;
pub mod feedback;
pub mod parser;
pub mod profile;
pub mod schema;
pub mod source;
pub mod weights;

pub use engine::{LoadStatus, LoadedRules, RuleEngine};
pub use error::{Result, RuleError};
pub use feedback::{Direction, Feedback, FeedbackPolicy, PolicyUpdate, LEARNING_RATE, SUPPRESSION_THRESHOLD};
pub use parser::{ParseDiagnostic, ParseReport, RuleParser};
pub use profile::{ProfileResolution, ProfileResolver, ProfileStatus, UNIVERSAL_SHEET};
pub use schema::{Cell, Row, RuleKey, RuleSet, Sheet, Thresholds};
pub use source::{SheetSource, Workbook, WorkbookFile};
pub use weights::{JsonFileBackend, MemoryBackend, WeightBackend, WeightMap, WeightStore};
