// ============================================================
// NormalizeMinMax - rescale every dimension to [0, 1]
// ============================================================
// Fit records the per-dimension min and max of the training
// vectors. Transform maps
//
//     x → (x - min) / (max - min)      clamped to [0, 1]
//
// A dimension that was constant at fit time maps to 0.
//
// The statistics belong to the fitted pipeline. A query is always
// scaled with the training min/max, never with its own values.

use serde::{Deserialize, Serialize};

use crate::data::view::{Column, DataView};
use crate::domain::error::Result;
use crate::ml::transforms::Transformer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxNormalizer {
    column: String,
    min:    Vec<f32>,
    max:    Vec<f32>,
}

impl MinMaxNormalizer {
    pub fn fit(view: &DataView, column: &str) -> Result<Self> {
        let vectors = view.vectors(column)?;
        let dim     = vectors.iter().map(Vec::len).max().unwrap_or(0);

        let mut min = vec![f32::INFINITY; dim];
        let mut max = vec![f32::NEG_INFINITY; dim];
        for v in vectors {
            for i in 0..dim {
                // Short rows count as zeros in the missing dimensions
                let x  = v.get(i).copied().unwrap_or(0.0);
                min[i] = min[i].min(x);
                max[i] = max[i].max(x);
            }
        }

        Ok(Self { column: column.to_string(), min, max })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn dim(&self) -> usize {
        self.min.len()
    }

    pub fn scale(&self, v: &[f32]) -> Vec<f32> {
        (0..self.dim())
            .map(|i| {
                let x     = v.get(i).copied().unwrap_or(0.0);
                let range = self.max[i] - self.min[i];
                if range > 0.0 {
                    ((x - self.min[i]) / range).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Transformer for MinMaxNormalizer {
    fn transform(&self, mut view: DataView) -> Result<DataView> {
        let mut vectors = view.take_vectors(&self.column)?;
        for v in vectors.iter_mut() {
            *v = self.scale(v);
        }
        view.with_column(self.column.clone(), Column::Vector(vectors))
    }
}
