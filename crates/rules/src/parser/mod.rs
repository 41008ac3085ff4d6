//! Rule-sheet parser: turns header-less rows into a [`RuleSet`](crate::schema::RuleSet).
//!
//! Rows are classified by keyword against a declarative table
//! ([`NUMERIC_RULES`]); the first cell with digits supplies the value.
//! Rows mentioning a policy keyword contribute their description column
//! to the textual policies. No numeric rows at all → defaults.

mod core;
mod matcher;


pub use self::core::{ParseDiagnostic, ParseReport, RuleParser};
pub use self::matcher::{KeywordRule, DESCRIPTION_COLUMN, NUMERIC_RULES, POLICY_KEYWORDS};
