// ============================================================
// Layer 4 - Classifier Training Samples
// ============================================================
// After the feature pipeline has run, each labelled row becomes
// one TrainingSample: the normalized Input vector plus its label
// key. Rows whose label is missing are not samples.
//
// The Input column is moved out of the view, so building the
// dataset does not duplicate the feature vectors.
//
// Implements Burn's Dataset trait so the DataLoader can call
// .get(index) and .len() on it.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use burn::data::dataset::Dataset;

use crate::data::view::DataView;
use crate::domain::error::{QnaError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub input: Vec<f32>,
    pub label: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ClassifierDataset {
    samples:   Vec<TrainingSample>,
    input_dim: usize,
}

impl ClassifierDataset {
    /// Collect labelled samples from a transformed view.
    ///
    /// Fails on any NaN or infinite feature value.
    pub fn from_view(mut view: DataView, label_column: &str, input_column: &str) -> Result<Self> {
        let labels = view.keys(label_column)?.to_vec();
        let inputs = view.take_vectors(input_column)?;
        let rows   = inputs.len();

        let mut samples   = Vec::with_capacity(rows);
        let mut input_dim = 0usize;

        for (row, (label, input)) in labels.into_iter().zip(inputs).enumerate() {
            if input.iter().any(|v| !v.is_finite()) {
                return Err(QnaError::NonFiniteFeature {
                    column: input_column.to_string(),
                    row,
                });
            }
            input_dim = input_dim.max(input.len());
            if let Some(label) = label {
                samples.push(TrainingSample { input, label });
            }
        }

        let skipped = rows - samples.len();
        if skipped > 0 {
            tracing::warn!("Skipped {} rows with a missing label", skipped);
        }

        Ok(Self { samples, input_dim })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of distinct label keys among the samples
    pub fn distinct_labels(&self) -> usize {
        let mut seen: Vec<u32> = self.samples.iter().map(|s| s.label).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

impl Dataset<TrainingSample> for ClassifierDataset {
    fn get(&self, index: usize) -> Option<TrainingSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::ClassifierBatcher;
    use crate::data::view::Column;
    use crate::ml::InferBackend;
    use burn::data::dataloader::DataLoaderBuilder;
    use std::sync::Arc;

    fn view(labels: Vec<Option<u32>>, inputs: Vec<Vec<f32>>) -> DataView {
        DataView::new(labels.len())
            .with_column("Label", Column::Key(labels))
            .unwrap()
            .with_column("Input", Column::Vector(inputs))
            .unwrap()
    }

    /// One epoch of the first input value of every sample, in batch order.
    fn epoch_order(ds: Arc<ClassifierDataset>, seed: u64) -> Vec<Vec<f32>> {
        let batcher = ClassifierBatcher::<InferBackend>::new(Default::default(), 1);
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(4)
            .shuffle(seed)
            .build(ds);
        loader
            .iter()
            .map(|batch| batch.inputs.into_data().to_vec::<f32>().unwrap())
            .collect()
    }

    #[test]
    fn test_missing_labels_are_skipped() {
        let v  = view(vec![Some(0), None, Some(1)], vec![vec![0.0], vec![1.0], vec![0.5]]);
        let ds = ClassifierDataset::from_view(v, "Label", "Input").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).map(|s| s.label), Some(1));
        assert_eq!(ds.get(1).map(|s| s.input), Some(vec![0.5]));
        assert_eq!(ds.distinct_labels(), 2);
        assert_eq!(ds.input_dim(), 1);
    }

    #[test]
    fn test_non_finite_feature_fails() {
        let v   = view(vec![Some(0), Some(1)], vec![vec![0.0], vec![f32::NAN]]);
        let err = ClassifierDataset::from_view(v, "Label", "Input").unwrap_err();
        assert!(matches!(err, QnaError::NonFiniteFeature { row: 1, .. }));
    }

    #[test]
    fn test_loader_batches_cover_every_sample_once() {
        let v  = view((0..10).map(|i| Some(i % 3)).collect(), (0..10).map(|i| vec![i as f32]).collect());
        let ds = Arc::new(ClassifierDataset::from_view(v, "Label", "Input").unwrap());

        let batches = epoch_order(ds, 7);
        assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), [4, 4, 2]);

        let mut all: Vec<f32> = batches.into_iter().flatten().collect();
        all.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(all, (0..10).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_loader_same_seed_same_order() {
        let v  = view((0..20).map(|i| Some(i % 2)).collect(), (0..20).map(|i| vec![i as f32]).collect());
        let ds = Arc::new(ClassifierDataset::from_view(v, "Label", "Input").unwrap());
        assert_eq!(epoch_order(ds.clone(), 42), epoch_order(ds, 42));
    }
}
