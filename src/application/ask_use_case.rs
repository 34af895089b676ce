// ============================================================
// Layer 2 - Ask Use Case
// ============================================================
// Loads a saved model and answers questions from a console.
//
//   open()      - loads the artifact; a schema mismatch is printed
//                 and reported as "no session" instead of an error
//   run_loop()  - prompt → read line → predict → print, until
//                 end-of-input (or the optional exit command)
//   answer()    - one question, one answer
//   answer_to() - one question, answer written as prefix + text
//
// The loop is generic over BufRead + Write so tests drive it with
// in-memory buffers.

use anyhow::{Context, Result};
use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use crate::domain::error::QnaError;
use crate::domain::record::PredictionResult;
use crate::domain::schema::Schema;
use crate::domain::traits::QuestionAnswerer;
use crate::infra::model_store::{ModelStore, DEFAULT_MODEL_PATH};
use crate::ml::context::{MlContext, DEFAULT_SEED};
use crate::ml::inferencer::{PredictionEngine, DEFAULT_FALLBACK_ANSWER};
use crate::ml::model::TrainedModel;

pub const DEFAULT_PROMPT: &str = "请输入问题：";
pub const DEFAULT_ANSWER_PREFIX: &str = "答案是：";
pub const SCHEMA_MISMATCH_MESSAGE: &str = "模型的架构与加载的数据不兼容";

#[derive(Debug, Clone)]
pub struct AskConfig {
    pub model_path:       PathBuf,
    pub seed:             u64,
    pub prompt:           String,
    pub answer_prefix:    String,
    /// Line that ends the session; end-of-input always does
    pub exit_command:     Option<String>,
    pub fallback_answer:  String,
    pub mismatch_message: String,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            model_path:       PathBuf::from(DEFAULT_MODEL_PATH),
            seed:             DEFAULT_SEED,
            prompt:           DEFAULT_PROMPT.to_string(),
            answer_prefix:    DEFAULT_ANSWER_PREFIX.to_string(),
            exit_command:     None,
            fallback_answer:  DEFAULT_FALLBACK_ANSWER.to_string(),
            mismatch_message: SCHEMA_MISMATCH_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoopState {
    AwaitingInput,
    Predicting(String),
    Stopped,
}

pub struct AskUseCase {
    config: AskConfig,
    engine: PredictionEngine,
}

impl AskUseCase {
    /// Load the model at `config.model_path`.
    ///
    /// Returns `Ok(None)` after writing the mismatch message to `out`
    /// when the saved schema is incompatible with the question/answer input.
    pub fn open(config: AskConfig, out: &mut impl Write) -> Result<Option<Self>> {
        let ctx   = MlContext::new(config.seed);
        let store = ModelStore::new(&config.model_path);

        match store.load(&ctx, &Schema::qna_input()) {
            Ok(model) => Ok(Some(Self::with_model(config, &ctx, model))),
            Err(QnaError::SchemaMismatch { column, reason }) => {
                tracing::warn!("Schema mismatch on column '{}': {}", column, reason);
                writeln!(out, "{}", config.mismatch_message)?;
                out.flush()?;
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| {
                format!("failed to load model from '{}'", config.model_path.display())
            }),
        }
    }

    /// Wrap an already loaded (or freshly trained) model.
    pub fn with_model(config: AskConfig, ctx: &MlContext, model: TrainedModel) -> Self {
        let engine = PredictionEngine::new(ctx, model).with_fallback(config.fallback_answer.clone());
        Self { config, engine }
    }

    pub fn answer(&self, question: &str) -> Result<PredictionResult> {
        self.engine
            .answer(question)
            .with_context(|| format!("failed to answer '{question}'"))
    }

    /// Answer `question` and write `answer_prefix` + answer as one line.
    pub fn answer_to<W: Write>(&self, question: &str, output: &mut W) -> Result<PredictionResult> {
        let result = self.answer(question)?;
        writeln!(output, "{}{}", self.config.answer_prefix, result.answer)?;
        Ok(result)
    }

    /// Run the console loop. Returns how many questions were answered.
    pub fn run_loop<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<usize> {
        let mut state    = LoopState::AwaitingInput;
        let mut answered = 0usize;
        let mut line     = String::new();

        loop {
            state = match state {
                LoopState::AwaitingInput => {
                    write!(output, "{}", self.config.prompt)?;
                    output.flush()?;

                    line.clear();
                    if input.read_line(&mut line)? == 0 {
                        LoopState::Stopped
                    } else {
                        let question = line.trim_end_matches(['\n', '\r']).to_string();
                        match &self.config.exit_command {
                            Some(cmd) if question.trim() == cmd => LoopState::Stopped,
                            _ => LoopState::Predicting(question),
                        }
                    }
                }
                LoopState::Predicting(question) => {
                    self.answer_to(&question, &mut output)?;
                    answered += 1;
                    LoopState::AwaitingInput
                }
                LoopState::Stopped => break,
            };
        }

        tracing::info!("Session ended after {} questions", answered);
        Ok(answered)
    }
}
