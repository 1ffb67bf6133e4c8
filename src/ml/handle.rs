// ============================================================
// Layer 5 — Model Handle
// ============================================================
// The explicit, injected "loaded model" object with a defined
// lifecycle: constructed empty, populated from a checkpoint,
// read-only thereafter, swappable only via an atomic publish.
// Never a bare global.
//
// Inference is read-only over the published Arc, so any number of
// concurrent requests may hold it without locking. A reload swaps
// the Arc in one write-lock critical section — in-flight requests
// keep the model they already resolved and never observe a
// half-updated one.
//
// Reference: Rust Book §16 (Shared-State Concurrency)

use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};

use crate::domain::error::ModelError;
use crate::domain::vocabulary::Vocabulary;
use crate::infra::checkpoint;
use crate::ml::converter;
use crate::ml::generator;
use crate::ml::model::CharLstmModel;

type InferBackend = burn::backend::Wgpu;

/// A checkpointed model, its vocabulary and its device — everything
/// one inference request needs, immutable once constructed.
#[derive(Debug)]
pub struct LoadedModel {
    model: CharLstmModel<InferBackend>,
    vocab: Vocabulary,
    device: burn::backend::wgpu::WgpuDevice,
}

impl LoadedModel {
    /// Rebuild the model from a checkpoint's metadata path and load
    /// its weights. Fails on missing files, corrupt metadata, a
    /// vocabulary/size mismatch, or weight shapes that disagree with
    /// the recorded architecture.
    pub fn from_checkpoint(meta_path: &Path) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();

        let meta = checkpoint::load_meta(meta_path)?;
        let vocab = meta.vocabulary()?;
        let model: CharLstmModel<InferBackend> = meta.model_config().init(&device);
        let model = checkpoint::load_weights(meta_path, model, &device)
            .with_context(|| format!("loading checkpoint '{}'", meta_path.display()))?;

        tracing::info!(
            "Model loaded from '{}' (vocab_size={})",
            meta_path.display(),
            vocab.size(),
        );
        Ok(Self { model, vocab, device })
    }

    /// Autoregressive continuation (step mode).
    pub fn generate(&self, seed_text: &str, max_length: usize, seq_len: usize) -> String {
        generator::generate(
            &self.model,
            &self.vocab,
            seed_text,
            max_length,
            seq_len,
            &self.device,
        )
    }

    /// One-shot royal-register transform (full-sequence mode).
    pub fn convert(&self, text: &str) -> Result<String, ModelError> {
        converter::convert(&self.model, &self.vocab, text, &self.device)
    }
}

/// Shareable slot holding the currently published model, if any.
pub struct ModelHandle {
    slot: RwLock<Option<Arc<LoadedModel>>>,
}

impl ModelHandle {
    /// An empty handle — inference fails with ModelNotLoaded until a
    /// checkpoint is published.
    pub fn empty() -> Self {
        Self { slot: RwLock::new(None) }
    }

    /// Load a checkpoint and publish it atomically.
    pub fn load(&self, meta_path: &Path) -> Result<()> {
        let loaded = Arc::new(LoadedModel::from_checkpoint(meta_path)?);
        self.publish(loaded);
        Ok(())
    }

    /// Swap in a new model as a unit.
    pub fn publish(&self, loaded: Arc<LoadedModel>) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(loaded);
    }

    /// The currently published model, or ModelNotLoaded.
    pub fn get(&self) -> Result<Arc<LoadedModel>, ModelError> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.clone().ok_or(ModelError::ModelNotLoaded)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_handle_reports_model_not_loaded() {
        let handle = ModelHandle::empty();
        let err = handle.get().unwrap_err();
        assert!(matches!(err, ModelError::ModelNotLoaded));
    }

    #[test]
    fn test_load_from_missing_checkpoint_fails() {
        let handle = ModelHandle::empty();
        assert!(handle.load(Path::new("/nonexistent/checkpoint.json")).is_err());
        // Still empty after the failed load
        assert!(handle.get().is_err());
    }
}
