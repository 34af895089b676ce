// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the training workflow in order:
//
//   Step 1: Load question,answer rows   (Layer 4 - data)
//   Step 2: Build the column view       (Layer 4 - data)
//   Step 3: Fit the feature pipeline    (Layer 5 - ml)
//   Step 4: Inspect the transformed view
//   Step 5: Train the classifier        (Layer 5 - ml)
//   Step 6: Save the model artifact     (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::{
    loader::{CsvLoader, LoaderOptions},
    view::DataView,
};
use crate::domain::schema::{self, Schema};
use crate::domain::traits::RecordSource;
use crate::infra::model_store::{ModelStore, DEFAULT_MODEL_PATH};
use crate::ml::context::{MlContext, DEFAULT_SEED};
use crate::ml::model::TrainedModel;
use crate::ml::pipeline::{FeaturePipeline, FittedPipeline};
use crate::ml::transforms::featurizer::DEFAULT_MAX_NGRAMS;
use crate::ml::trainer::{Trainer, TrainerOptions, TrainingReport};

pub const DEFAULT_DATA_PATH: &str = "daily_conversation_dataset.csv";

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub data_path:  PathBuf,
    pub model_path: PathBuf,
    pub seed:       u64,
    /// Upper bound on the character n-gram dictionary
    pub max_ngrams: usize,
    pub loader:     LoaderOptions,
    pub trainer:    TrainerOptions,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:  PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            seed:       DEFAULT_SEED,
            max_ngrams: DEFAULT_MAX_NGRAMS,
            loader:     LoaderOptions::default(),
            trainer:    TrainerOptions::default(),
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the workflow end to end. The returned model is the one
    /// written to `model_path`.
    pub fn execute(&self) -> Result<(TrainedModel, TrainingReport)> {
        let cfg = &self.config;
        let ctx = MlContext::new(cfg.seed);

        // ── Step 1: Load rows ────────────────────────────────────────────────
        tracing::info!("Loading data from '{}'", cfg.data_path.display());
        let dataset = CsvLoader::with_options(&cfg.data_path, cfg.loader.clone())
            .load_all()
            .with_context(|| format!("failed to load '{}'", cfg.data_path.display()))?;
        tracing::info!(
            "Loaded {} rows ({} distinct answers)",
            dataset.len(),
            dataset.distinct_answers().len()
        );

        // ── Step 2: Column view ──────────────────────────────────────────────
        let view = DataView::from_dataset(&dataset);

        // ── Step 3: Fit the pipeline once; the same instance is reused ────────
        let fitted = FeaturePipeline::qna(cfg.max_ngrams)
            .fit(&ctx, &view)
            .context("failed to fit feature pipeline")?;

        // ── Step 4: Inspection ───────────────────────────────────────────────
        let transformed = fitted
            .transform(&view)
            .context("failed to transform training data")?;
        drop(view);
        inspect(&fitted, &transformed);

        // ── Step 5: Train ────────────────────────────────────────────────────
        let (model, report) = Trainer::new(cfg.trainer.clone())
            .fit(&ctx, fitted, transformed)
            .context("training failed")?;

        // ── Step 6: Save ─────────────────────────────────────────────────────
        ModelStore::new(&cfg.model_path)
            .save(&model, &Schema::qna_input())
            .with_context(|| format!("failed to save model to '{}'", cfg.model_path.display()))?;

        Ok((model, report))
    }
}

fn inspect(fitted: &FittedPipeline, view: &DataView) {
    let labels = fitted.label_mapping().map_or(0, |m| m.len());
    let width  = fitted.vector_dim(schema::INPUT).unwrap_or(0);
    tracing::info!(
        "Preprocessed view: {} rows, {} columns, {} features, {} labels",
        view.rows(),
        view.schema().columns().len(),
        width,
        labels
    );
}
