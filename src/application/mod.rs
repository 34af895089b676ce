// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal:
// training a model, or answering questions with one.
//
// Rules for this layer:
//   - No ML math or model code here
//   - Console I/O only through the Write/BufRead handles it is given
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

use anyhow::Result;
use std::io::{BufRead, Write};

// The training workflow
pub mod train_use_case;

// The question-answering workflow
pub mod ask_use_case;

use ask_use_case::{AskConfig, AskUseCase};
use train_use_case::{TrainConfig, TrainUseCase};

/// Train, save, reload, then serve questions from `input` until it ends.
///
/// The model is reloaded from disk rather than reused from memory so the
/// session always runs on exactly what was saved. Returns the number of
/// questions answered (0 when the saved schema was rejected).
pub fn run_full<R: BufRead, W: Write>(
    train:  TrainConfig,
    ask:    AskConfig,
    input:  R,
    output: &mut W,
) -> Result<usize> {
    let ask = AskConfig {
        model_path: train.model_path.clone(),
        ..ask
    };

    TrainUseCase::new(train).execute()?;

    match AskUseCase::open(ask, output)? {
        Some(session) => session.run_loop(input, output),
        None          => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor};
    use tempfile::tempdir;

    #[test]
    fn test_full_run_answers_from_saved_model() {
        let dir       = tempdir().unwrap();
        let data_path = dir.path().join("data.csv");
        fs::write(&data_path, "What is your name?,Bot\nHow are you?,Fine\nWhat is your name?,Bot\n").unwrap();

        let train = TrainConfig {
            data_path,
            model_path: dir.path().join("QnAModel.zip"),
            ..TrainConfig::default()
        };

        let mut out = Vec::new();
        let n = run_full(
            train,
            AskConfig::default(),
            Cursor::new("What is your name?\nHow are you?\n"),
            &mut out,
        )
        .unwrap();

        assert_eq!(n, 2);
        assert!(dir.path().join("QnAModel.zip").exists());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "请输入问题：答案是：Bot\n请输入问题：答案是：Fine\n请输入问题："
        );
    }
}
