// ============================================================
// Layer 5 - Feature Pipeline
// ============================================================
// An ordered chain of column transforms. `fit` walks the stages in
// order: each stage is fitted on the output of the stages before
// it, then applied so the next stage sees its columns.
//
//   FeaturePipeline::qna(max_ngrams)
//     MapValueToKey   Label    ← Answer
//     FeaturizeText   Features ← Question
//     Concatenate     Input    ← [Features]   (Features is consumed)
//     NormalizeMinMax Input                   (scaled in place)
//
// Only one dense copy of the feature vectors exists in a
// transformed view: the Input column.
//
// The result is a FittedPipeline: plain data (dictionaries and
// min/max statistics), serializable with serde and reused as-is
// for training, saving and every prediction.

use serde::{Deserialize, Serialize};

use crate::data::view::DataView;
use crate::domain::error::Result;
use crate::domain::schema;
use crate::ml::context::MlContext;
use crate::ml::transforms::{
    concat::Concatenator,
    featurizer::TextFeaturizer,
    key_mapping::KeyMapping,
    normalizer::MinMaxNormalizer, Transformer,
};

/// An unfitted stage description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageSpec {
    MapValueToKey { output: String, input: String },
    FeaturizeText { output: String, input: String, max_ngrams: usize },
    Concatenate { output: String, inputs: Vec<String> },
    NormalizeMinMax { column: String },
}

impl StageSpec {
    fn fit(&self, view: &DataView) -> Result<FittedStage> {
        Ok(match self {
            StageSpec::MapValueToKey { output, input } => {
                FittedStage::MapValueToKey(KeyMapping::fit(view, input, output)?)
            }
            StageSpec::FeaturizeText { output, input, max_ngrams } => {
                FittedStage::FeaturizeText(TextFeaturizer::fit(view, input, output, *max_ngrams)?)
            }
            StageSpec::Concatenate { output, inputs } => {
                FittedStage::Concatenate(Concatenator::new(output.clone(), inputs.clone()))
            }
            StageSpec::NormalizeMinMax { column } => {
                FittedStage::NormalizeMinMax(MinMaxNormalizer::fit(view, column)?)
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePipeline {
    stages: Vec<StageSpec>,
}

impl FeaturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The question/answer chain used by the application, keeping at
    /// most `max_ngrams` character n-grams.
    pub fn qna(max_ngrams: usize) -> Self {
        Self::new()
            .append(StageSpec::MapValueToKey {
                output: schema::LABEL.into(),
                input:  schema::ANSWER.into(),
            })
            .append(StageSpec::FeaturizeText {
                output:     schema::FEATURES.into(),
                input:      schema::QUESTION.into(),
                max_ngrams,
            })
            .append(StageSpec::Concatenate {
                output: schema::INPUT.into(),
                inputs: vec![schema::FEATURES.into()],
            })
            .append(StageSpec::NormalizeMinMax { column: schema::INPUT.into() })
    }

    pub fn append(mut self, stage: StageSpec) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn fit(&self, ctx: &MlContext, view: &DataView) -> Result<FittedPipeline> {
        tracing::debug!(
            "Fitting {} stages on {} rows (seed {})",
            self.stages.len(),
            view.rows(),
            ctx.seed()
        );

        let mut fitted  = Vec::with_capacity(self.stages.len());
        let mut current = view.clone();
        for spec in &self.stages {
            let stage = spec.fit(&current)?;
            current   = stage.transform(current)?;
            fitted.push(stage);
        }
        Ok(FittedPipeline { stages: fitted })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FittedStage {
    MapValueToKey(KeyMapping),
    FeaturizeText(TextFeaturizer),
    Concatenate(Concatenator),
    NormalizeMinMax(MinMaxNormalizer),
}

impl Transformer for FittedStage {
    fn transform(&self, view: DataView) -> Result<DataView> {
        match self {
            FittedStage::MapValueToKey(t)   => t.transform(view),
            FittedStage::FeaturizeText(t)   => t.transform(view),
            FittedStage::Concatenate(t)     => t.transform(view),
            FittedStage::NormalizeMinMax(t) => t.transform(view),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    stages: Vec<FittedStage>,
}

impl FittedPipeline {
    /// Apply every stage in order. The input view is not modified.
    pub fn transform(&self, view: &DataView) -> Result<DataView> {
        self.stages
            .iter()
            .try_fold(view.clone(), |current, stage| stage.transform(current))
    }

    /// The label dictionary that produced the `Label` column, if any.
    pub fn label_mapping(&self) -> Option<&KeyMapping> {
        self.stages.iter().rev().find_map(|s| match s {
            FittedStage::MapValueToKey(m) if m.output() == schema::LABEL => Some(m),
            _ => None,
        })
    }

    /// Width of the vector in `column` after the whole chain.
    pub fn vector_dim(&self, column: &str) -> Option<usize> {
        self.stages.iter().rev().find_map(|s| match s {
            FittedStage::NormalizeMinMax(n) if n.column() == column => Some(n.dim()),
            FittedStage::FeaturizeText(f) if f.output() == column => Some(f.dim()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;
    use crate::ml::transforms::featurizer::DEFAULT_MAX_NGRAMS;

    fn training_view() -> DataView {
        DataView::from_records(&[
            Record::new("What is your name?", "Bot"),
            Record::new("How are you?", "Fine"),
            Record::new("What is your name?", "Bot"),
        ])
    }

    #[test]
    fn test_qna_pipeline_produces_all_columns() {
        let ctx    = MlContext::default();
        let fitted = FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(&ctx, &training_view()).unwrap();
        let out    = fitted.transform(&training_view()).unwrap();

        assert_eq!(out.keys(schema::LABEL).unwrap(), &[Some(0), Some(1), Some(0)]);
        let input = out.vectors(schema::INPUT).unwrap();
        assert_eq!(input.len(), 3);
        assert!(input.iter().flatten().all(|x| (0.0..=1.0).contains(x)));
        assert_eq!(Some(input[0].len()), fitted.vector_dim(schema::INPUT));
    }

    #[test]
    fn test_transform_is_idempotent() {
        let ctx    = MlContext::default();
        let fitted = FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(&ctx, &training_view()).unwrap();
        let query  = DataView::from_records(&[Record::query("What is your name?")]);
        let a = fitted.transform(&query).unwrap();
        let b = fitted.transform(&query).unwrap();
        assert_eq!(a.vectors(schema::INPUT).unwrap(), b.vectors(schema::INPUT).unwrap());
        assert_eq!(a.keys(schema::LABEL).unwrap(), &[None]);
    }

    #[test]
    fn test_single_query_uses_frozen_statistics() {
        let ctx    = MlContext::default();
        let fitted = FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(&ctx, &training_view()).unwrap();
        let batch  = fitted.transform(&training_view()).unwrap();
        let single = fitted
            .transform(&DataView::from_records(&[Record::query("How are you?")]))
            .unwrap();
        assert_eq!(
            single.vectors(schema::INPUT).unwrap()[0],
            batch.vectors(schema::INPUT).unwrap()[1]
        );
    }

    #[test]
    fn test_transformed_view_holds_one_vector_column() {
        let ctx    = MlContext::default();
        let fitted = FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(&ctx, &training_view()).unwrap();
        let out    = fitted.transform(&training_view()).unwrap();

        let binding = out.schema();
        let names: Vec<&str> = binding.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, [schema::QUESTION, schema::ANSWER, schema::LABEL, schema::INPUT]);
    }

    #[test]
    fn test_max_ngrams_bounds_input_width() {
        let ctx    = MlContext::default();
        let fitted = FeaturePipeline::qna(4)
            .fit(&ctx, &training_view())
            .unwrap();
        assert_eq!(fitted.vector_dim(schema::INPUT), Some(4));
    }

    #[test]
    fn test_label_mapping_is_exposed() {
        let ctx    = MlContext::default();
        let fitted = FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(&ctx, &training_view()).unwrap();
        let labels = fitted.label_mapping().unwrap();
        assert_eq!(labels.values(), &["Bot".to_string(), "Fine".to_string()]);
    }

    #[test]
    fn test_missing_source_column_fails() {
        let ctx  = MlContext::default();
        let view = DataView::new(0);
        assert!(FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(&ctx, &view).is_err());
    }
}
