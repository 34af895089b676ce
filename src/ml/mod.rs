// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// Everything that learns or predicts lives here.
//
//   context.rs    - MlContext: seed + Burn device, passed to every stage
//
//   transforms/   - The four column transforms (label keys, text
//                   featurization, concatenation, min-max scaling)
//
//   pipeline.rs   - FeaturePipeline (stage list) and FittedPipeline
//                   (frozen, serializable result of fitting it)
//
//   model.rs      - LinearClassifier (one burn Linear layer) and the
//                   TrainedModel bundle
//
//   trainer.rs    - Adam over seeded mini-batches, cross-entropy + L2
//
//   inferencer.rs - PredictionEngine: one question in, one answer out
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Backend used for prediction and for the saved parameters
pub type InferBackend = burn::backend::NdArray;

/// Backend used while training (adds autodiff)
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub mod context;

pub mod transforms;

pub mod pipeline;

/// Linear classifier and the trained model bundle
pub mod model;

/// Training loop
pub mod trainer;

/// Prediction engine
pub mod inferencer;
