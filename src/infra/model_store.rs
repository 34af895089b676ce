// ============================================================
// Layer 6 - Model Store
// ============================================================
// Saves and restores a TrainedModel as ONE artifact file.
//
// What goes into the artifact:
//   1. format version         - rejects files from other layouts
//   2. input schema           - checked against the caller on load
//   3. fitted pipeline        - dictionaries + min/max statistics
//   4. label names            - key → answer table
//   5. classifier shape       - input_dim, num_classes
//   6. classifier parameters  - Burn record, BinBytesRecorder bytes
//
// The envelope is bincode-encoded and gzip-compressed.
//
// Load order matters: the schema is checked before the Burn record
// is decoded, so an incompatible artifact is rejected without
// touching the parameters.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use burn::{
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use crate::domain::error::{QnaError, Result};
use crate::domain::schema::Schema;
use crate::ml::context::MlContext;
use crate::ml::model::{LinearClassifierConfig, LinearClassifierRecord, TrainedModel};
use crate::ml::pipeline::FittedPipeline;
use crate::ml::InferBackend;

/// Default artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "QnAModel.zip";

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    schema:         Schema,
    pipeline:       FittedPipeline,
    label_names:    Vec<String>,
    input_dim:      usize,
    num_classes:    usize,
    classifier:     Vec<u8>,
}

pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `model` with `schema` to the artifact path, replacing
    /// any existing file.
    pub fn save(&self, model: &TrainedModel, schema: &Schema) -> Result<()> {
        let recorder   = BinBytesRecorder::<FullPrecisionSettings>::default();
        let classifier = Recorder::<InferBackend>::record(
            &recorder,
            model.classifier.clone().into_record(),
            (),
        )
        .map_err(|e| QnaError::Serialization(e.to_string()))?;

        let artifact = ModelArtifact {
            format_version: FORMAT_VERSION,
            schema:         schema.clone(),
            pipeline:       model.pipeline().clone(),
            label_names:    model.label_names().to_vec(),
            input_dim:      model.input_dim(),
            num_classes:    model.num_classes(),
            classifier,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| QnaError::io(parent, e))?;
        }

        let file    = File::create(&self.path).map_err(|e| QnaError::io(&self.path, e))?;
        let mut enc = GzEncoder::new(BufWriter::new(file), Compression::default());
        bincode::serialize_into(&mut enc, &artifact)
            .map_err(|e| QnaError::Serialization(e.to_string()))?;
        enc.finish()
            .and_then(|mut w| w.flush())
            .map_err(|e| QnaError::io(&self.path, e))?;

        tracing::info!(
            "Saved model ({} answers, {} features) to '{}'",
            artifact.num_classes,
            artifact.input_dim,
            self.path.display()
        );
        Ok(())
    }

    /// Read the artifact back. Fails with `SchemaMismatch` when a column
    /// recorded in the artifact is not offered by `expected`.
    pub fn load(&self, ctx: &MlContext, expected: &Schema) -> Result<TrainedModel> {
        let file = File::open(&self.path).map_err(|e| QnaError::io(&self.path, e))?;
        let artifact: ModelArtifact =
            bincode::deserialize_from(GzDecoder::new(BufReader::new(file)))
                .map_err(|e| QnaError::Serialization(e.to_string()))?;

        if artifact.format_version != FORMAT_VERSION {
            return Err(QnaError::UnsupportedFormat {
                found:    artifact.format_version,
                expected: FORMAT_VERSION,
            });
        }

        artifact.schema.satisfied_by(expected)?;

        let recorder = BinBytesRecorder::<FullPrecisionSettings>::default();
        let record: LinearClassifierRecord<InferBackend> =
            Recorder::<InferBackend>::load(&recorder, artifact.classifier, ctx.device())
                .map_err(|e| QnaError::Serialization(e.to_string()))?;
        let classifier = LinearClassifierConfig::new(artifact.input_dim, artifact.num_classes)
            .init::<InferBackend>(ctx.device())
            .load_record(record);

        tracing::info!(
            "Loaded model ({} answers) from '{}'",
            artifact.label_names.len(),
            self.path.display()
        );

        Ok(TrainedModel {
            pipeline:    artifact.pipeline,
            classifier,
            label_names: artifact.label_names,
            input_dim:   artifact.input_dim,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::view::DataView;
    use crate::domain::record::Record;
    use crate::domain::schema::ColumnKind;
    use crate::domain::traits::QuestionAnswerer;
    use crate::ml::inferencer::PredictionEngine;
    use crate::ml::pipeline::FeaturePipeline;
    use crate::ml::transforms::featurizer::DEFAULT_MAX_NGRAMS;
    use crate::ml::trainer::{Trainer, TrainerOptions};
    use tempfile::tempdir;

    fn records() -> Vec<Record> {
        vec![
            Record::new("What is your name?", "Bot"),
            Record::new("How are you?", "Fine"),
            Record::new("Where do you live?", "In a computer"),
            Record::new("What is your name?", "Bot"),
        ]
    }

    fn trained(ctx: &MlContext) -> TrainedModel {
        let view   = DataView::from_records(&records());
        let fitted = FeaturePipeline::qna(DEFAULT_MAX_NGRAMS).fit(ctx, &view).unwrap();
        let data   = fitted.transform(&view).unwrap();
        Trainer::new(TrainerOptions::default())
            .fit(ctx, fitted, data)
            .unwrap()
            .0
    }

    #[test]
    fn test_round_trip_predicts_identically() {
        let ctx   = MlContext::default();
        let dir   = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("QnAModel.zip"));

        let original = trained(&ctx);
        store.save(&original, &Schema::qna_input()).unwrap();
        let loaded = store.load(&ctx, &Schema::qna_input()).unwrap();

        assert_eq!(loaded.label_names(), original.label_names());
        assert_eq!(loaded.pipeline(), original.pipeline());

        let before = PredictionEngine::new(&ctx, original);
        let after  = PredictionEngine::new(&ctx, loaded);
        for q in ["What is your name?", "How are you?", "Where do you live?", "", "unknown words"] {
            assert_eq!(before.answer(q).unwrap(), after.answer(q).unwrap());
        }
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let ctx   = MlContext::default();
        let dir   = tempdir().unwrap();
        let path  = dir.path().join("model.zip");
        fs::write(&path, b"not a model").unwrap();

        let store = ModelStore::new(&path);
        store.save(&trained(&ctx), &Schema::qna_input()).unwrap();
        assert!(store.load(&ctx, &Schema::qna_input()).is_ok());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let ctx   = MlContext::default();
        let dir   = tempdir().unwrap();
        let path  = dir.path().join("nested/dir/model.zip");
        ModelStore::new(&path).save(&trained(&ctx), &Schema::qna_input()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_schema_with_unknown_column_is_rejected() {
        let ctx   = MlContext::default();
        let dir   = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.zip"));

        let artifact_schema = Schema::qna_input().with_column("X", ColumnKind::Text);
        store.save(&trained(&ctx), &artifact_schema).unwrap();

        match store.load(&ctx, &Schema::qna_input()) {
            Err(QnaError::SchemaMismatch { column, .. }) => assert_eq!(column, "X"),
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupted_file_is_a_serialization_error() {
        let ctx  = MlContext::default();
        let dir  = tempdir().unwrap();
        let path = dir.path().join("model.zip");
        fs::write(&path, b"garbage").unwrap();

        let err = ModelStore::new(&path).load(&ctx, &Schema::qna_input()).unwrap_err();
        assert!(matches!(err, QnaError::Serialization(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let ctx = MlContext::default();
        let err = ModelStore::new("/no/such/QnAModel.zip")
            .load(&ctx, &Schema::qna_input())
            .unwrap_err();
        assert!(matches!(err, QnaError::Io { .. }));
    }
}
