// ============================================================
// Layer 5 - Linear Classifier
// ============================================================
// logits = x·W + b over the normalized Input vector, one output
// per answer. Trained with softmax cross-entropy plus an L2
// penalty on W.
//
// Reference: Burn Book §3 (Modules and Configs)

use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Initializer, Linear, LinearConfig,
    },
    prelude::*,
};

use crate::ml::pipeline::FittedPipeline;
use crate::ml::InferBackend;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally - do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LinearClassifierConfig {
    pub input_dim:   usize,
    pub num_classes: usize,
}

impl LinearClassifierConfig {
    /// Weights and bias start at zero, so two fits with the same
    /// seed and data produce the same parameters.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LinearClassifier<B> {
        let linear = LinearConfig::new(self.input_dim, self.num_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LinearClassifier { linear }
    }
}

/// One linear layer: logits = x·W + b
#[derive(Module, Debug)]
pub struct LinearClassifier<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LinearClassifier<B> {
    /// inputs: [batch, input_dim] → logits: [batch, num_classes]
    pub fn forward(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(inputs)
    }

    /// Mean softmax cross-entropy plus an L2 penalty on the weights.
    pub fn forward_loss(
        &self,
        inputs:  Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
        l2:      f32,
    ) -> Tensor<B, 1> {
        let logits = self.forward(inputs);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits, targets);

        let w = self.linear.weight.val();
        let penalty = (w.clone() * w).sum().mul_scalar(l2);
        loss + penalty
    }
}

/// Everything needed to answer a question: the fitted feature chain,
/// the classifier and the key → answer table.
#[derive(Debug)]
pub struct TrainedModel {
    pub(crate) pipeline:    FittedPipeline,
    pub(crate) classifier:  LinearClassifier<InferBackend>,
    pub(crate) label_names: Vec<String>,
    pub(crate) input_dim:   usize,
}

impl TrainedModel {
    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }

    /// Answers in key order
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn num_classes(&self) -> usize {
        self.label_names.len()
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn decode(&self, key: u32) -> Option<&str> {
        self.label_names.get(key as usize).map(String::as_str)
    }
}
