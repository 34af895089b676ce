// ============================================================
// Layer 3 - Error Types
// ============================================================
// Every failure the pipeline can report. The application layer
// wraps these in anyhow with context; only SchemaMismatch is
// ever inspected (downcast) and handled.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QnaError>;

#[derive(Error, Debug)]
pub enum QnaError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path:   PathBuf,
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row with the wrong number of fields
    #[error("line {line}: expected {expected} columns, found {found}")]
    Format {
        line:     u64,
        expected: usize,
        found:    usize,
    },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' has kind {found}, expected {expected}")]
    ColumnType {
        column:   String,
        expected: String,
        found:    String,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RowCount {
        column:   String,
        expected: usize,
        found:    usize,
    },

    /// Fewer than two distinct labels to learn from
    #[error("need at least 2 distinct labels to train, found {0}")]
    DegenerateLabels(usize),

    #[error("non-finite value in column '{column}' at row {row}")]
    NonFiniteFeature {
        column: String,
        row:    usize,
    },

    #[error("column '{0}' has no features to train on")]
    EmptyFeatures(String),

    #[error("model schema is incompatible: column '{column}': {reason}")]
    SchemaMismatch {
        column: String,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedFormat {
        found:    u32,
        expected: u32,
    },

    #[error("tokenizer error: {0}")]
    Tokenize(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl QnaError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        QnaError::Io { path: path.into(), source }
    }
}
