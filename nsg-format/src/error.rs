//! Error types for NSG dumps

use std::path::PathBuf;
use thiserror::Error;

/// NSG error types
#[derive(Debug, Error)]
pub enum NsgError {
    /// Input file is missing, unreadable, or does not hold valid JSON.
    #[error("Parse error in '{}': {reason}", .path.display())]
    Parse {
        /// Path of the offending input (`<memory>` for in-memory input)
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
    /// A required field is absent or has the wrong type.
    #[error("Schema error: '{field}' {reason}")]
    Schema {
        /// Wire name of the field, e.g. `messages[].Direction`
        field: String,
        /// What is wrong with it
        reason: String,
    },
    /// Output was requested before the dump was parsed.
    #[error("Dump has not been parsed yet")]
    NotParsed,
    /// I/O operation failed while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl NsgError {
    /// Build a [`NsgError::Parse`] for the given input.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        NsgError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`NsgError::Schema`] for the given field.
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        NsgError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the lenient mapper may skip over.
    pub fn is_schema(&self) -> bool {
        matches!(self, NsgError::Schema { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, NsgError>;
