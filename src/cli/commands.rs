// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Subcommands `train` and `ask`, plus the flag groups shared by
// every mode. Running with no subcommand trains, saves, reloads
// and starts the question loop.
//
// clap's derive macros generate help text, error messages for bad
// values and the string → number conversions.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{ask_use_case::AskConfig, train_use_case::TrainConfig};
use crate::data::loader::LoaderOptions;
use crate::ml::trainer::TrainerOptions;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on the CSV file and save the model, then exit
    Train,

    /// Answer questions with a previously saved model
    Ask {
        /// Answer this one question instead of starting the loop
        #[arg(long)]
        question: Option<String>,
    },
}

/// Paths and seed, used by every mode
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// question,answer CSV file to train on
    #[arg(long, global = true, default_value = "daily_conversation_dataset.csv")]
    pub data: PathBuf,

    /// Where the model artifact is written and read
    #[arg(long, global = true, default_value = "QnAModel.zip")]
    pub model: PathBuf,

    /// Seed for shuffling during training
    #[arg(long, global = true, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Full passes over the training rows
    #[arg(long, global = true, default_value_t = 100)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, global = true, default_value_t = 0.05)]
    pub lr: f64,

    /// L2 penalty on the classifier weights
    #[arg(long, global = true, default_value_t = 1e-4)]
    pub l2: f32,

    #[arg(long, global = true, default_value_t = 64)]
    pub batch_size: usize,

    /// Treat the first CSV line as a header
    #[arg(long, global = true)]
    pub has_header: bool,

    /// Largest character n-gram dictionary kept (most frequent first)
    #[arg(long, global = true, default_value_t = 8192)]
    pub max_ngrams: usize,

    /// Single ASCII field separator
    #[arg(long, global = true, default_value = ",", value_parser = parse_separator)]
    pub separator: u8,
}

#[derive(Args, Debug, Clone)]
pub struct LoopArgs {
    #[arg(long, global = true, default_value = "请输入问题：")]
    pub prompt: String,

    #[arg(long, global = true, default_value = "答案是：")]
    pub answer_prefix: String,

    /// Line that ends the session (end-of-input always does)
    #[arg(long, global = true)]
    pub exit_command: Option<String>,

    /// Printed when the predicted answer cannot be resolved
    #[arg(long, global = true, default_value = "no answer found")]
    pub fallback_answer: String,
}

fn parse_separator(s: &str) -> Result<u8, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("separator must be a single ASCII character, got '{s}'")),
    }
}

/// Boundary between Layer 1 and Layer 2: the application layer
/// never sees clap types.
impl From<(&CommonArgs, &TrainArgs)> for TrainConfig {
    fn from((common, a): (&CommonArgs, &TrainArgs)) -> Self {
        TrainConfig {
            data_path:  common.data.clone(),
            model_path: common.model.clone(),
            seed:       common.seed,
            max_ngrams: a.max_ngrams,
            loader:     LoaderOptions {
                separator:  a.separator,
                has_header: a.has_header,
                ..LoaderOptions::default()
            },
            trainer:    TrainerOptions {
                epochs:        a.epochs,
                learning_rate: a.lr,
                l2:            a.l2,
                batch_size:    a.batch_size,
            },
        }
    }
}

impl From<(&CommonArgs, &LoopArgs)> for AskConfig {
    fn from((common, a): (&CommonArgs, &LoopArgs)) -> Self {
        AskConfig {
            model_path:      common.model.clone(),
            seed:            common.seed,
            prompt:          a.prompt.clone(),
            answer_prefix:   a.answer_prefix.clone(),
            exit_command:    a.exit_command.clone(),
            fallback_answer: a.fallback_answer.clone(),
            ..AskConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator(","), Ok(b','));
        assert_eq!(parse_separator("\t"), Ok(b'\t'));
        assert!(parse_separator("，").is_err());
        assert!(parse_separator(",,").is_err());
        assert!(parse_separator("").is_err());
    }
}
