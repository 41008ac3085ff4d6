//! Heterogeneous spreadsheet cells and rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of a rule sheet. Sheets have no header row, so a cell is
/// whatever the author typed: free text, a bare number, a checkbox or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Display text used for keyword matching and digit extraction.
    ///
    /// Integral numbers render without a fractional part (`44.0` → `"44"`).
    pub fn render(&self) -> String {
        match self {
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// One table row; positions are significant (column 2 carries the description).
pub type Row = Vec<Cell>;

/// A named sheet of raw rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}
