//! Rule source documents: multi-sheet workbooks of raw rows.
//!
//! A workbook file is YAML (JSON also parses) shaped as
//!
//! ```yaml
//! sheets:
//!   Healthcare:
//!     - ["Button min tap target", "", "44px minimum"]
//!     - ["HIPAA", "Compliance", "Mask patient identifiers"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RuleError};
use crate::schema::{Row, Sheet};

/// Anything that can hand out the rows of a named sheet.
pub trait SheetSource {
    /// Rows of `sheet_id`; [`RuleError::SourceUnavailable`] if missing or unreadable.
    fn sheet(&self, sheet_id: &str) -> Result<Vec<Row>>;

    /// Names of all sheets, in document order.
    fn sheet_names(&self) -> Vec<String>;
}

impl<S: SheetSource + ?Sized> SheetSource for &S {
    fn sheet(&self, sheet_id: &str) -> Result<Vec<Row>> {
        (**self).sheet(sheet_id)
    }

    fn sheet_names(&self) -> Vec<String> {
        (**self).sheet_names()
    }
}

/// Fully loaded, in-memory workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    sheets: IndexMap<String, Vec<Row>>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a workbook from YAML or JSON text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Read and parse a workbook file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let workbook = Self::parse(&contents)?;
        debug!(path = %path.display(), sheets = workbook.sheets.len(), "loaded rule workbook");
        Ok(workbook)
    }

    /// Add or replace a sheet.
    pub fn insert_sheet(&mut self, sheet: Sheet) -> &mut Self {
        self.sheets.insert(sheet.name, sheet.rows);
        self
    }
}

impl SheetSource for Workbook {
    fn sheet(&self, sheet_id: &str) -> Result<Vec<Row>> {
        self.sheets
            .get(sheet_id)
            .cloned()
            .ok_or_else(|| RuleError::SourceUnavailable {
                sheet: sheet_id.to_string(),
                reason: "no such sheet in workbook".to_string(),
            })
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }
}

/// Workbook on disk, re-read on every lookup so edits are picked up
/// between audit runs.
#[derive(Debug, Clone)]
pub struct WorkbookFile {
    path: PathBuf,
}

impl WorkbookFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, sheet_id: &str) -> Result<Workbook> {
        Workbook::from_path(&self.path).map_err(|e| RuleError::SourceUnavailable {
            sheet: sheet_id.to_string(),
            reason: format!("{}: {}", self.path.display(), e),
        })
    }
}

impl SheetSource for WorkbookFile {
    fn sheet(&self, sheet_id: &str) -> Result<Vec<Row>> {
        self.load(sheet_id)?.sheet(sheet_id)
    }

    fn sheet_names(&self) -> Vec<String> {
        self.load("*").map(|wb| wb.sheet_names()).unwrap_or_default()
    }
}
