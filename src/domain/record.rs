// ============================================================
// Layer 3 - Record, Dataset and PredictionResult
// ============================================================
// A Record is one line of the training CSV: a question and the
// answer that should be returned for it.
//
// The Dataset keeps records in file order. Training does not
// depend on the order, but keeping it makes log output and
// error messages line up with the source file.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One labelled training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Free-form question text, the only model input
    pub question: String,

    /// The answer string, used as the classification target
    pub answer: String,
}

impl Record {
    /// Create a new Record.
    ///
    /// Example:
    ///   let r = Record::new("How are you?", "Fine");
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer:   answer.into(),
        }
    }

    /// A query record carries only the question. The answer is
    /// left empty, which the label mapping treats as missing.
    pub fn query(question: impl Into<String>) -> Self {
        Self::new(question, String::new())
    }
}

/// An ordered, immutable collection of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct answers in first-seen order
    pub fn distinct_answers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.answer.as_str()) {
                seen.push(r.answer.as_str());
            }
        }
        seen
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The decoded outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The answer string mapped back from the predicted key
    pub answer: String,

    /// The predicted label key, `None` when it failed to decode
    pub key: Option<u32>,

    /// Softmax probability of the chosen key
    pub score: f32,
}
