// ============================================================
// Layer 4 - Classifier Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<TrainingSample>
// into tensors the classifier can consume.
//
// How batching works here:
//   Input:  N samples, each an Input vector of length D
//   Output: inputs  [N, D]  (Float)
//           targets [N]     (Int, the label keys)
//
//   All inputs are flattened row by row into one Vec, then the
//   1D tensor is reshaped to [N, D].
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::TrainingSample;

#[derive(Debug, Clone)]
pub struct ClassifierBatch<B: Backend> {
    /// Normalized feature rows, shape [batch_size, input_dim]
    pub inputs: Tensor<B, 2>,

    /// Label keys, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct ClassifierBatcher<B: Backend> {
    pub device:    B::Device,
    pub input_dim: usize,
}

impl<B: Backend> ClassifierBatcher<B> {
    pub fn new(device: B::Device, input_dim: usize) -> Self {
        Self { device, input_dim }
    }

    /// A single-row batch for prediction.
    pub fn query(&self, input: &[f32]) -> Tensor<B, 2> {
        let mut row = input.to_vec();
        row.resize(self.input_dim, 0.0);
        Tensor::<B, 1>::from_floats(row.as_slice(), &self.device).reshape([1, self.input_dim])
    }
}

// The DataLoader calls .batch(items, device) with each mini-batch.
impl<B: Backend> Batcher<B, TrainingSample, ClassifierBatch<B>> for ClassifierBatcher<B> {
    fn batch(&self, items: Vec<TrainingSample>, device: &B::Device) -> ClassifierBatch<B> {
        let dim  = self.input_dim;
        let rows = items.len();

        let mut flat    = Vec::with_capacity(rows * dim);
        let mut targets = Vec::with_capacity(rows);
        for mut sample in items {
            // Every row must be exactly `dim` wide for the reshape
            sample.input.resize(dim, 0.0);
            flat.extend_from_slice(&sample.input);
            targets.push(sample.label as i32);
        }

        let inputs  = Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([rows, dim]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), device);

        ClassifierBatch { inputs, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::InferBackend;

    fn sample(input: Vec<f32>, label: u32) -> TrainingSample {
        TrainingSample { input, label }
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = ClassifierBatcher::<InferBackend>::new(Default::default(), 2);
        let batch   = batcher.batch(
            vec![sample(vec![0.1, 0.2], 2), sample(vec![0.3, 0.4], 0)],
            &Default::default(),
        );
        assert_eq!(batch.inputs.dims(), [2, 2]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_short_rows_are_zero_padded() {
        let batcher = ClassifierBatcher::<InferBackend>::new(Default::default(), 3);
        let batch   = batcher.batch(vec![sample(vec![1.0], 0)], &Default::default());
        assert_eq!(batch.inputs.into_data().to_vec::<f32>().unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_query_is_one_row() {
        let batcher = ClassifierBatcher::<InferBackend>::new(Default::default(), 4);
        let row     = batcher.query(&[0.5, 0.5]);
        assert_eq!(row.dims(), [1, 4]);
    }
}
