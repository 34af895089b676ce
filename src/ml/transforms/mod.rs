// ============================================================
// Layer 5 - Column Transforms
// ============================================================
// The four fitted stages of the feature pipeline. Each one reads
// columns from a DataView and adds or replaces a column.
//
//   key_mapping.rs  Answer   → Label     (text → key)
//   featurizer.rs   Question → Features  (text → vector)
//   concat.rs       Features → Input     (vectors → vector)
//   normalizer.rs   Input    → Input     (min-max to [0, 1])

pub mod concat;
pub mod featurizer;
pub mod key_mapping;
pub mod normalizer;

use crate::data::view::DataView;
use crate::domain::error::Result;

/// A fitted, frozen column transform.
pub trait Transformer {
    fn transform(&self, view: DataView) -> Result<DataView>;
}
