// ============================================================
// Layer 5 - Prediction Engine
// ============================================================
// Answers one question with a frozen TrainedModel.
//
// Per question:
//   1. transform  - the fitted pipeline turns the lone record into
//                   a normalized Input vector (unseen n-grams and
//                   words add nothing)
//   2. logits     - one [1, input_dim] row through the classifier
//   3. argmax     - best key plus its softmax probability
//   4. decode     - key → answer through the label table
//   5. fallback   - a key with no answer yields the configured
//                   fallback text and a warning
//
// Nothing is refitted here; the model is read-only.

use burn::prelude::*;

use crate::data::{batcher::ClassifierBatcher, view::DataView};
use crate::domain::error::{QnaError, Result};
use crate::domain::record::{PredictionResult, Record};
use crate::domain::schema;
use crate::domain::traits::QuestionAnswerer;
use crate::ml::context::MlContext;
use crate::ml::model::TrainedModel;
use crate::ml::InferBackend;

pub const DEFAULT_FALLBACK_ANSWER: &str = "no answer found";

pub struct PredictionEngine {
    model:    TrainedModel,
    batcher:  ClassifierBatcher<InferBackend>,
    fallback: String,
}

impl PredictionEngine {
    pub fn new(ctx: &MlContext, model: TrainedModel) -> Self {
        Self {
            batcher:  ClassifierBatcher::new(ctx.device().clone(), model.input_dim),
            model,
            fallback: DEFAULT_FALLBACK_ANSWER.to_string(),
        }
    }

    /// Answer returned when a predicted key has no answer attached
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn predict(&self, record: &Record) -> Result<PredictionResult> {
        let view = self
            .model
            .pipeline
            .transform(&DataView::from_records(std::slice::from_ref(record)))?;
        let input = view
            .vectors(schema::INPUT)?
            .first()
            .ok_or_else(|| QnaError::MissingColumn(schema::INPUT.to_string()))?;

        let num_classes = self.model.num_classes();
        let logits = self
            .model
            .classifier
            .forward(self.batcher.query(input))
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| QnaError::Backend(format!("{e:?}")))?;

        let (key, score) = argmax_rows(&logits, num_classes)
            .first()
            .copied()
            .unwrap_or((usize::MAX, 0.0));

        let key = u32::try_from(key).ok();
        let result = match key.and_then(|k| self.model.decode(k)) {
            Some(answer) => PredictionResult {
                answer: answer.to_string(),
                key,
                score,
            },
            None => {
                tracing::warn!("Predicted key {:?} has no answer; using fallback", key);
                PredictionResult { answer: self.fallback.clone(), key: None, score }
            }
        };

        tracing::debug!(
            "'{}' → '{}' (key={:?} p={:.4})",
            record.question,
            result.answer,
            result.key,
            result.score
        );
        Ok(result)
    }
}

impl QuestionAnswerer for PredictionEngine {
    fn answer(&self, question: &str) -> Result<PredictionResult> {
        self.predict(&Record::query(question))
    }
}

/// Row-major logits [rows, classes] → (best class, softmax probability) per row.
///
/// Ties go to the lowest key.
pub fn argmax_rows(logits: &[f32], classes: usize) -> Vec<(usize, f32)> {
    if classes == 0 {
        return Vec::new();
    }
    logits
        .chunks(classes)
        .map(|row| {
            let (best, max) = row
                .iter()
                .copied()
                .enumerate()
                .fold((0usize, f32::NEG_INFINITY), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });
            let denom: f32 = row.iter().map(|v| (v - max).exp()).sum();
            (best, 1.0 / denom)
        })
        .collect()
}
