//! Core [`RuleParser`]: one pass over the rows of a sheet.

use serde::Serialize;
use tracing::debug;

use crate::error::RuleError;
use crate::schema::{Cell, Row, RuleKey, RuleSet, Thresholds};

use super::matcher::{classify, mentions_any, KeywordRule, DESCRIPTION_COLUMN, NUMERIC_RULES, POLICY_KEYWORDS};

/// Non-fatal problem found while parsing. Never aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseDiagnostic {
    /// A cell had digits but they did not form a positive `u32`.
    MalformedCell {
        row: usize,
        cell: usize,
        reason: String,
    },
    /// A row matched a numeric rule but no cell carried a usable number.
    MissingValue { row: usize, key: RuleKey },
}

impl ParseDiagnostic {
    /// Convert to the error taxonomy, where one exists.
    pub fn as_error(&self) -> Option<RuleError> {
        match self {
            ParseDiagnostic::MalformedCell { row, cell, reason } => Some(RuleError::MalformedCell {
                row: *row,
                cell: *cell,
                reason: reason.clone(),
            }),
            ParseDiagnostic::MissingValue { .. } => None,
        }
    }
}

/// Result of parsing one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub rule_set: RuleSet,
    /// `true` when no numeric rule was extracted and defaults were substituted.
    pub used_defaults: bool,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Stateless row classifier. Parsing the same rows twice gives the same report.
#[derive(Debug, Clone)]
pub struct RuleParser {
    numeric_rules: &'static [KeywordRule],
    policy_keywords: &'static [&'static str],
    description_column: usize,
}

impl Default for RuleParser {
    fn default() -> Self {
        Self {
            numeric_rules: NUMERIC_RULES,
            policy_keywords: POLICY_KEYWORDS,
            description_column: DESCRIPTION_COLUMN,
        }
    }
}

impl RuleParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser using a custom classification table.
    pub fn with_table(
        numeric_rules: &'static [KeywordRule],
        policy_keywords: &'static [&'static str],
    ) -> Self {
        Self {
            numeric_rules,
            policy_keywords,
            ..Self::default()
        }
    }

    /// Parse rows into a rule set.
    ///
    /// A later row matching the same key overwrites the earlier value.
    pub fn parse(&self, rows: &[Row]) -> ParseReport {
        let mut thresholds = Thresholds::default();
        let mut textual_policies = Vec::new();
        let mut diagnostics = Vec::new();

        for (row_idx, row) in rows.iter().enumerate() {
            let haystack = render_row(row);

            if mentions_any(self.policy_keywords, &haystack) {
                if let Some(cell) = row.get(self.description_column) {
                    textual_policies.push(cell.render());
                }
            }

            let Some(key) = classify(self.numeric_rules, &haystack) else {
                continue;
            };

            match first_number(row_idx, row, &mut diagnostics) {
                Some(value) => {
                    if let Some(previous) = thresholds.insert(key, value) {
                        debug!(%key, previous, value, row = row_idx, "rule value overwritten by later row");
                    }
                }
                None => diagnostics.push(ParseDiagnostic::MissingValue { row: row_idx, key }),
            }
        }

        let used_defaults = thresholds.is_empty();
        let defaults = Thresholds::defaults();
        let numeric_thresholds = if used_defaults { defaults.clone() } else { thresholds };

        ParseReport {
            rule_set: RuleSet {
                numeric_thresholds,
                textual_policies,
                defaults,
            },
            used_defaults,
            diagnostics,
        }
    }
}

/// All cells joined into one lower-cased string for keyword matching.
fn render_row(row: &[Cell]) -> String {
    row.iter()
        .map(Cell::render)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Scan left to right for the first cell yielding a positive integer.
///
/// Cells without digits are skipped silently; cells whose digits are zero or
/// overflow are recorded as malformed and scanning continues.
fn first_number(row_idx: usize, row: &[Cell], diagnostics: &mut Vec<ParseDiagnostic>) -> Option<u32> {
    for (cell_idx, cell) in row.iter().enumerate() {
        let digits: String = cell.render().chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            continue;
        }
        match digits.parse::<u32>() {
            Ok(0) => diagnostics.push(ParseDiagnostic::MalformedCell {
                row: row_idx,
                cell: cell_idx,
                reason: "value is zero".to_string(),
            }),
            Ok(value) => return Some(value),
            Err(e) => diagnostics.push(ParseDiagnostic::MalformedCell {
                row: row_idx,
                cell: cell_idx,
                reason: format!("'{}': {}", digits, e),
            }),
        }
    }
    None
}
