//! Rule-engine data types.
//!
//! - `RuleKey`: closed enumeration of numeric rule categories
//! - `Cell` / `Row` / `Sheet`: raw, header-less rule tables
//! - `Thresholds` / `RuleSet`: the structured result of parsing one sheet

mod cell;
mod key;
mod ruleset;

pub use cell::*;
pub use key::*;
pub use ruleset::*;
