// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer talks to loaders and predictors through
// these traits, so tests can substitute in-memory versions and
// the CSV loader can be swapped for another source.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::Result;
use crate::domain::record::{Dataset, PredictionResult};

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce a training Dataset.
///
/// Implementations:
///   - CsvLoader → reads a delimited text file
pub trait RecordSource {
    fn load_all(&self) -> Result<Dataset>;
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Any component that can answer natural language questions.
///
/// Implementations:
///   - PredictionEngine → runs the fitted pipeline and classifier
pub trait QuestionAnswerer {
    /// Given a question string, return the decoded prediction.
    fn answer(&self, question: &str) -> Result<PredictionResult>;
}
