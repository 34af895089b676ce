// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All business logic is delegated to Layer 2 (application).
//
//   (none)  - train, save, reload, then answer questions from stdin
//   train   - train and save only
//   ask     - load a saved model and answer questions
//
// stdout carries only the prompt/answer conversation; logs go to stderr.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};

use crate::application::{
    self,
    ask_use_case::{AskConfig, AskUseCase},
    train_use_case::{TrainConfig, TrainUseCase},
};
use commands::{Commands, CommonArgs, LoopArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "qna-classifier",
    version,
    about = "Train a question → answer classifier from a CSV file, then ask it questions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub train: TrainArgs,

    #[command(flatten)]
    pub ask: LoopArgs,
}

impl Cli {
    /// Dispatch to the use case for the chosen mode.
    pub fn run(self) -> Result<()> {
        let train_cfg = TrainConfig::from((&self.common, &self.train));
        let ask_cfg   = AskConfig::from((&self.common, &self.ask));

        match self.command {
            None                           => run_full(train_cfg, ask_cfg),
            Some(Commands::Train)          => run_train(train_cfg),
            Some(Commands::Ask { question }) => run_ask(ask_cfg, question),
        }
    }
}

fn run_full(train: TrainConfig, ask: AskConfig) -> Result<()> {
    let stdin  = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    application::run_full(train, ask, stdin.lock(), &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_train(cfg: TrainConfig) -> Result<()> {
    let path = cfg.model_path.clone();
    let (_, report) = TrainUseCase::new(cfg).execute()?;

    tracing::info!(
        "Saved '{}' after {} epochs on {} samples (loss {:.4}, training accuracy {:.1}%)",
        path.display(),
        report.epochs,
        report.samples,
        report.final_loss,
        report.accuracy * 100.0
    );
    Ok(())
}

fn run_ask(cfg: AskConfig, question: Option<String>) -> Result<()> {
    let stdout  = io::stdout();
    let mut out = stdout.lock();
    ask(cfg, question.as_deref(), io::stdin().lock(), &mut out)?;
    out.flush()?;
    Ok(())
}

/// Open the model, then answer `question` once or run the console loop.
fn ask<R: BufRead, W: Write>(
    cfg:      AskConfig,
    question: Option<&str>,
    input:    R,
    out:      &mut W,
) -> Result<()> {
    let Some(session) = AskUseCase::open(cfg, out)? else {
        return Ok(());
    };

    match question {
        Some(q) => {
            session.answer_to(q, out)?;
        }
        None => {
            session.run_loop(input, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor, path::PathBuf};
    use tempfile::{tempdir, TempDir};

    fn trained_model() -> (TempDir, AskConfig) {
        let dir       = tempdir().unwrap();
        let data_path = dir.path().join("data.csv");
        fs::write(&data_path, "What is your name?,Bot\nHow are you?,Fine\n").unwrap();

        let train = TrainConfig {
            data_path,
            model_path: dir.path().join("QnAModel.zip"),
            ..TrainConfig::default()
        };
        TrainUseCase::new(train.clone()).execute().unwrap();

        let ask = AskConfig { model_path: train.model_path, ..AskConfig::default() };
        (dir, ask)
    }

    #[test]
    fn test_ask_with_question_prints_one_answer_without_prompt() {
        let (_dir, cfg) = trained_model();
        let mut out = Vec::new();
        ask(cfg, Some("What is your name?"), io::empty(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "答案是：Bot\n");
    }

    #[test]
    fn test_ask_without_question_runs_the_loop() {
        let (_dir, cfg) = trained_model();
        let mut out = Vec::new();
        ask(cfg, None, Cursor::new("How are you?\n"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "请输入问题：答案是：Fine\n请输入问题："
        );
    }

    #[test]
    fn test_ask_with_missing_model_fails() {
        let cfg = AskConfig {
            model_path: PathBuf::from("/no/such/QnAModel.zip"),
            ..AskConfig::default()
        };
        let mut out = Vec::new();
        assert!(ask(cfg, Some("hi"), io::empty(), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_arguments_selects_full_pipeline_with_defaults() {
        let cli = Cli::try_parse_from(["qna-classifier"]).unwrap();
        assert!(cli.command.is_none());

        let train = TrainConfig::from((&cli.common, &cli.train));
        assert_eq!(train.data_path, PathBuf::from("daily_conversation_dataset.csv"));
        assert_eq!(train.model_path, PathBuf::from("QnAModel.zip"));
        assert_eq!(train.loader.separator, b',');
        assert!(!train.loader.has_header);
        assert_eq!(train.max_ngrams, 8192);

        let ask = AskConfig::from((&cli.common, &cli.ask));
        assert_eq!(ask.prompt, "请输入问题：");
        assert_eq!(ask.answer_prefix, "答案是：");
        assert_eq!(ask.exit_command, None);
    }

    #[test]
    fn test_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "qna-classifier", "ask", "--question", "How are you?", "--model", "m.zip",
            "--exit-command", "quit",
        ])
        .unwrap();

        match &cli.command {
            Some(Commands::Ask { question }) => assert_eq!(question.as_deref(), Some("How are you?")),
            other => panic!("unexpected command {other:?}"),
        }
        let ask = AskConfig::from((&cli.common, &cli.ask));
        assert_eq!(ask.model_path, PathBuf::from("m.zip"));
        assert_eq!(ask.exit_command.as_deref(), Some("quit"));
    }

    #[test]
    fn test_train_flags_reach_trainer_options() {
        let cli = Cli::try_parse_from([
            "qna-classifier", "train", "--epochs", "5", "--separator", ";", "--has-header",
            "--max-ngrams", "512",
        ])
        .unwrap();
        let train = TrainConfig::from((&cli.common, &cli.train));
        assert_eq!(train.trainer.epochs, 5);
        assert_eq!(train.max_ngrams, 512);
        assert_eq!(train.loader.separator, b';');
        assert!(train.loader.has_header);
    }
}
