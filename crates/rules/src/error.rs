//! Error types for the compliance-rule engine.
//!
//! Only [`RuleError::Persistence`] is expected to reach callers of the
//! feedback API; source and cell errors are absorbed by the parser and
//! engine and turned into default behaviour plus a diagnostic.

/// Errors that can occur while loading rule sheets or persisting weights.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Rule sheet or workbook missing or unreadable.
    #[error("rule source unavailable for sheet '{sheet}': {reason}")]
    SourceUnavailable { sheet: String, reason: String },

    /// A cell that should carry a number does not yield a usable value.
    #[error("malformed cell at row {row}, column {cell}: {reason}")]
    MalformedCell {
        row: usize,
        cell: usize,
        reason: String,
    },

    /// Rewriting the durable weight store failed.
    #[error("weight store persistence failed: {0}")]
    Persistence(String),

    /// Feedback was not +1 or -1.
    #[error("invalid feedback value {0}, expected +1 or -1")]
    InvalidFeedback(i32),

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result alias for rule engine operations.
pub type Result<T> = std::result::Result<T, RuleError>;
