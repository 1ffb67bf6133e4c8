// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model state using Burn's CompactRecorder.
//
// A checkpoint is a pair of files sharing one stem:
//   {stem}.mpk.gz — model weights (MessagePack, gzipped)
//   {stem}.json   — metadata: vocabulary (both directions),
//                   vocab_size, architecture hyperparameters, and
//                   for temporary checkpoints the epoch and
//                   validation loss
//
// The metadata is everything needed to rebuild the exact model
// before loading the weights into it. Loading validates that the
// recorded vocab_size matches the embedded mapping; the recorder
// itself rejects weights whose shapes disagree with the rebuilt
// architecture.
//
// Writes are atomic: content lands under a scratch name and is
// renamed into place, weights before metadata, so a reader that
// sees {stem}.json can rely on the weights beside it being
// complete.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{HalfPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::ModelError;
use crate::domain::vocabulary::{Vocabulary, RESERVED_SYMBOLS};
use crate::ml::model::{CharLstmConfig, CharLstmModel};

/// Stem of the recovery checkpoint written on validation improvement.
const TEMP_STEM: &str = "best_model_temp";

// ─── Checkpoint metadata ──────────────────────────────────────────────────────
/// The JSON half of a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub stoi: std::collections::BTreeMap<char, usize>,
    pub itos: std::collections::BTreeMap<usize, char>,
    pub vocab_size: usize,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
    pub num_layers: usize,
    /// Temporary checkpoints only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<usize>,
    /// Temporary checkpoints only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
}

impl CheckpointMeta {
    pub fn new(vocab: &Vocabulary, cfg: &TrainConfig, epoch: usize, val_loss: f64) -> Self {
        Self {
            stoi: vocab.stoi().clone(),
            itos: vocab.itos().clone(),
            vocab_size: vocab.size(),
            embedding_dim: cfg.embedding_dim,
            hidden_dim: cfg.hidden_dim,
            num_layers: cfg.num_layers,
            epoch: Some(epoch),
            val_loss: Some(val_loss),
        }
    }

    /// The same metadata without training-progress fields, for the
    /// final artifact.
    pub fn finalized(&self) -> Self {
        Self { epoch: None, val_loss: None, ..self.clone() }
    }

    /// Rebuild the embedded vocabulary, validating that the recorded
    /// size matches the mapping. A disagreement means the checkpoint
    /// was corrupted or assembled from mismatched halves — loading
    /// must fail, never silently truncate.
    pub fn vocabulary(&self) -> Result<Vocabulary, ModelError> {
        let actual = RESERVED_SYMBOLS + self.stoi.len();
        if self.vocab_size != actual {
            return Err(ModelError::CheckpointMismatch {
                expected: self.vocab_size,
                actual,
            });
        }
        Vocabulary::from_mappings(self.stoi.clone(), self.itos.clone())
    }

    /// The architecture needed to rebuild the model before loading
    /// weights into it.
    pub fn model_config(&self) -> CharLstmConfig {
        CharLstmConfig::new(
            self.vocab_size,
            self.embedding_dim,
            self.hidden_dim,
            self.num_layers,
        )
    }
}

// ─── Free functions over an arbitrary metadata path ───────────────────────────
/// Read checkpoint metadata from its JSON path.
pub fn load_meta(meta_path: &Path) -> Result<CheckpointMeta> {
    let json = fs::read_to_string(meta_path).with_context(|| {
        format!(
            "cannot read checkpoint metadata '{}' — has the model been trained?",
            meta_path.display()
        )
    })?;
    serde_json::from_str(&json)
        .with_context(|| format!("corrupt checkpoint metadata '{}'", meta_path.display()))
}

/// Load the weights beside a metadata path into a freshly built model.
pub fn load_weights<B: Backend>(
    meta_path: &Path,
    model: CharLstmModel<B>,
    device: &B::Device,
) -> Result<CharLstmModel<B>> {
    let stem = meta_path.with_extension("");
    let record = NamedMpkGzFileRecorder::<HalfPrecisionSettings>::new()
        .load(stem.clone(), device)
        .with_context(|| {
            format!(
                "cannot load checkpoint weights '{}.mpk.gz' — file missing, corrupt, \
                 or recorded for a different architecture",
                stem.display()
            )
        })?;
    Ok(model.load_record(record))
}

// ─── CheckpointManager ────────────────────────────────────────────────────────
/// Manages the checkpoints of one directory. Each training run must
/// use its own directory (the caller stamps the path per run) so
/// concurrent runs never race on the temporary checkpoint.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Path of the temporary checkpoint's metadata file.
    pub fn temp_meta_path(&self) -> PathBuf {
        self.dir.join(format!("{TEMP_STEM}.json"))
    }

    /// Persist the recovery checkpoint after a validation improvement.
    pub fn save_temp<B: Backend>(
        &self,
        model: &CharLstmModel<B>,
        meta: &CheckpointMeta,
    ) -> Result<()> {
        self.save_pair(TEMP_STEM, model, meta)?;
        tracing::debug!(
            "Saved temporary checkpoint (epoch {:?}, val_loss {:?})",
            meta.epoch,
            meta.val_loss,
        );
        Ok(())
    }

    pub fn load_temp_meta(&self) -> Result<CheckpointMeta> {
        load_meta(&self.temp_meta_path())
    }

    pub fn load_temp_weights<B: Backend>(
        &self,
        model: CharLstmModel<B>,
        device: &B::Device,
    ) -> Result<CharLstmModel<B>> {
        load_weights(&self.temp_meta_path(), model, device)
    }

    /// Persist a checkpoint pair under an arbitrary stem (used for the
    /// final, timestamp-stamped artifact). Returns (weights, metadata)
    /// paths.
    pub fn save_stamped<B: Backend>(
        &self,
        stem: &str,
        model: &CharLstmModel<B>,
        meta: &CheckpointMeta,
    ) -> Result<(PathBuf, PathBuf)> {
        self.save_pair(stem, model, meta)?;
        Ok((
            self.dir.join(format!("{stem}.mpk.gz")),
            self.dir.join(format!("{stem}.json")),
        ))
    }

    /// Delete the temporary checkpoint once the final artifact exists.
    pub fn remove_temp(&self) -> Result<()> {
        for path in [
            self.dir.join(format!("{TEMP_STEM}.mpk.gz")),
            self.temp_meta_path(),
        ] {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("cannot remove '{}'", path.display()))?;
            }
        }
        Ok(())
    }

    /// Atomic write of both halves: scratch name first, rename into
    /// place, weights before metadata.
    fn save_pair<B: Backend>(
        &self,
        stem: &str,
        model: &CharLstmModel<B>,
        meta: &CheckpointMeta,
    ) -> Result<()> {
        // CompactRecorder appends .mpk.gz to the stem it is given
        let scratch_stem = self.dir.join(format!("{stem}_incoming"));
        NamedMpkGzFileRecorder::<HalfPrecisionSettings>::new()
            .record(model.clone().into_record(), scratch_stem.clone())
            .with_context(|| {
                format!("failed to record checkpoint weights under '{}'", scratch_stem.display())
            })?;
        fs::rename(
            self.dir.join(format!("{stem}_incoming.mpk.gz")),
            self.dir.join(format!("{stem}.mpk.gz")),
        )
        .context("failed to publish checkpoint weights")?;

        let meta_scratch = self.dir.join(format!("{stem}.json.tmp"));
        fs::write(&meta_scratch, serde_json::to_string_pretty(meta)?)
            .with_context(|| format!("failed to write '{}'", meta_scratch.display()))?;
        fs::rename(&meta_scratch, self.dir.join(format!("{stem}.json")))
            .context("failed to publish checkpoint metadata")?;

        Ok(())
    }
}
