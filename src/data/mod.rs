// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the CSV file on disk to tensor batches.
//
//   questions.csv
//       │
//       ▼
//   CsvLoader          → reads rows into a Dataset of Records
//       │
//       ▼
//   DataView           → named, typed columns the transforms work on
//       │
//       ▼
//   (ml::pipeline)     → adds Label / Features / Input columns
//       │
//       ▼
//   ClassifierDataset  → (input vector, label key) samples
//       │
//       ▼
//   ClassifierBatcher  → stacks samples into tensor batches
//
// Preprocessor is used by the text featurizer to clean a line
// before tokenization.
//
// Reference: Burn Book §4 (Datasets and Batching)
//            Rust Book §13 (Iterators and Closures)

/// Reads question,answer rows from a delimited text file
pub mod loader;

/// Cleans a single line of raw text
pub mod preprocessor;

/// Column-oriented rows flowing through the transforms
pub mod view;

/// Labelled feature vectors ready for training
pub mod dataset;

/// Turns samples into tensor batches
pub mod batcher;
