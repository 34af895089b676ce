// ============================================================
// Layer 4 - CSV Record Loader
// ============================================================
// Loads question/answer pairs from a delimited text file using
// the csv crate.
//
// The file has no fixed header handling: by default every line is
// a record, and the question and answer are taken from fixed
// column positions (0 and 1). Quoted fields are supported, so a
// question may itself contain the separator:
//
//   "Hi, who are you?",I am a bot
//
// A row with the wrong number of fields fails the whole load.
// Silently skipping it would train on a different dataset than
// the one on disk.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use csv::ReaderBuilder;
use std::{fs::File, path::PathBuf};

use crate::domain::error::{QnaError, Result};
use crate::domain::record::{Dataset, Record};
use crate::domain::traits::RecordSource;

/// How to read the delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub separator:       u8,
    pub has_header:      bool,
    /// Exact number of fields every row must have
    pub columns:         usize,
    pub question_column: usize,
    pub answer_column:   usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            separator:       b',',
            has_header:      false,
            columns:         2,
            question_column: 0,
            answer_column:   1,
        }
    }
}

/// Reads Records from a CSV file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    path:    PathBuf,
    options: LoaderOptions,
}

impl CsvLoader {
    pub fn with_options(path: impl Into<PathBuf>, options: LoaderOptions) -> Self {
        Self { path: path.into(), options }
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Dataset> {
        let opts = &self.options;
        let file = File::open(&self.path).map_err(|e| QnaError::io(&self.path, e))?;

        // flexible(true) so that a short/long row reaches our own check
        // and is reported with its line number
        let mut reader = ReaderBuilder::new()
            .delimiter(opts.separator)
            .has_headers(opts.has_header)
            .flexible(true)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row  = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            if row.len() != opts.columns {
                return Err(QnaError::Format {
                    line,
                    expected: opts.columns,
                    found:    row.len(),
                });
            }

            let field = |idx: usize| -> Result<String> {
                row.get(idx).map(str::to_string).ok_or(QnaError::Format {
                    line,
                    expected: idx + 1,
                    found:    row.len(),
                })
            };
            records.push(Record::new(
                field(opts.question_column)?,
                field(opts.answer_column)?,
            ));
        }

        tracing::info!(
            "Loaded {} records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(Dataset::new(records))
    }
}
