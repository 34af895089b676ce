// ============================================================
// Layer 5 - Trainer
// ============================================================
// Fits the linear classifier on the output of the feature pipeline.
//
//   - Training runs on Autodiff<NdArray> for gradients
//   - Burn's DataLoader draws shuffled mini-batches, seeded from
//     the MlContext, so the same seed gives the same model
//   - model.valid() returns the model on NdArray for inference
//   - Samples without a label key are ignored
//   - One call, one fit: no incremental updates, no validation split
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use std::sync::Arc;

use crate::data::{batcher::ClassifierBatcher, dataset::ClassifierDataset, view::DataView};
use crate::domain::error::{QnaError, Result};
use crate::domain::schema;
use crate::ml::context::MlContext;
use crate::ml::model::{LinearClassifier, LinearClassifierConfig, TrainedModel};
use crate::ml::pipeline::FittedPipeline;
use crate::ml::{InferBackend, TrainBackend};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerOptions {
    pub epochs:        usize,
    pub learning_rate: f64,
    pub l2:            f32,
    pub batch_size:    usize,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            epochs:        100,
            learning_rate: 0.05,
            l2:            1e-4,
            batch_size:    64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub epochs:     usize,
    pub samples:    usize,
    pub final_loss: f64,
    /// Fraction of training samples the fitted model gets right
    pub accuracy:   f64,
}

pub struct Trainer {
    options: TrainerOptions,
}

impl Trainer {
    pub fn new(options: TrainerOptions) -> Self {
        Self { options }
    }

    /// Train on `data`, the output of `pipeline.transform(..)`.
    pub fn fit(
        &self,
        ctx:      &MlContext,
        pipeline: FittedPipeline,
        data:     DataView,
    ) -> Result<(TrainedModel, TrainingReport)> {
        let label_names: Vec<String> = pipeline
            .label_mapping()
            .ok_or_else(|| QnaError::MissingColumn(schema::LABEL.to_string()))?
            .values()
            .to_vec();

        let dataset = Arc::new(ClassifierDataset::from_view(data, schema::LABEL, schema::INPUT)?);
        let distinct = dataset.distinct_labels();
        if distinct < 2 {
            return Err(QnaError::DegenerateLabels(distinct));
        }

        let input_dim = pipeline
            .vector_dim(schema::INPUT)
            .unwrap_or_else(|| dataset.input_dim())
            .max(dataset.input_dim());
        if input_dim == 0 {
            return Err(QnaError::EmptyFeatures(schema::INPUT.to_string()));
        }
        let config = LinearClassifierConfig::new(input_dim, label_names.len());

        tracing::info!(
            "Training on {} samples: {} features → {} answers",
            dataset.len(),
            input_dim,
            label_names.len()
        );

        let (classifier, final_loss) = self.train_loop(ctx, &config, dataset.clone());
        let accuracy = training_accuracy(
            ctx,
            &classifier,
            dataset.clone(),
            input_dim,
            self.options.batch_size,
        );

        let report = TrainingReport {
            epochs: self.options.epochs,
            samples: dataset.len(),
            final_loss,
            accuracy,
        };
        tracing::info!(
            "Training complete: loss={:.4} accuracy={:.1}%",
            report.final_loss,
            report.accuracy * 100.0
        );

        let model = TrainedModel {
            pipeline,
            classifier,
            label_names,
            input_dim,
        };
        Ok((model, report))
    }

    fn train_loop(
        &self,
        ctx:     &MlContext,
        config:  &LinearClassifierConfig,
        dataset: Arc<ClassifierDataset>,
    ) -> (LinearClassifier<InferBackend>, f64) {
        let opts   = &self.options;
        let device = ctx.device().clone();

        let mut model: LinearClassifier<TrainBackend> = config.init(&device);
        let mut optim = AdamConfig::new()
            .with_epsilon(1e-8)
            .init::<TrainBackend, LinearClassifier<TrainBackend>>();

        let batcher = ClassifierBatcher::<TrainBackend>::new(device, config.input_dim);
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(opts.batch_size.max(1))
            .shuffle(ctx.seed())
            .build(dataset);

        let mut epoch_loss = f64::NAN;

        for epoch in 1..=opts.epochs {
            let mut loss_sum = 0.0f64;
            let mut batches  = 0usize;

            for batch in loader.iter() {
                let loss = model.forward_loss(batch.inputs, batch.targets, opts.l2);

                loss_sum += loss.clone().into_scalar().elem::<f64>();
                batches  += 1;

                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(opts.learning_rate, model, grads);
            }

            epoch_loss = loss_sum / batches.max(1) as f64;
            tracing::debug!("Epoch {:>3}/{} | loss={:.4}", epoch, opts.epochs, epoch_loss);
        }

        (model.valid(), epoch_loss)
    }
}

/// Fraction of samples whose argmax class equals their label.
fn training_accuracy(
    ctx:        &MlContext,
    classifier: &LinearClassifier<InferBackend>,
    dataset:    Arc<ClassifierDataset>,
    input_dim:  usize,
    batch_size: usize,
) -> f64 {
    let total   = dataset.len();
    let batcher = ClassifierBatcher::<InferBackend>::new(ctx.device().clone(), input_dim);
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(batch_size.max(1))
        .build(dataset);

    let mut correct = 0i64;
    for batch in loader.iter() {
        // argmax(1) is [batch, 1]; flatten to [batch] to compare with targets
        let predicted = classifier.forward(batch.inputs).argmax(1).flatten::<1>(0, 1);
        correct += predicted
            .equal(batch.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
    }

    correct as f64 / total.max(1) as f64
}
