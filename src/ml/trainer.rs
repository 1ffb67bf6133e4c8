// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Teacher-forced train + validation loop with early stopping and
// checkpoint recovery, using Burn's DataLoader and Adam.
//
// Per epoch:
//   1. train phase   — CE loss per batch, backward, Adam step
//   2. validate phase — same loss, updates disabled (model.valid())
//   3. checkpoint decision — strict improvement resets the wait
//      counter and persists a temporary checkpoint; otherwise the
//      counter grows until `patience` stops the loop
//   4. a non-finite loss aborts the run instead of training on NaN
//
// After the loop the best temporary checkpoint is reloaded — the
// exported model is always the best-validation model, never the
// last-epoch model — then the test split is scored and the final
// stamped artifact written.
//
// Key Burn insight (same split as the rest of this layer):
//   - training runs on TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on ValidBackend (Wgpu)
//   - the validation batcher must also use ValidBackend
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::WindowBatcher, dataset::WindowDataset};
use crate::domain::error::ModelError;
use crate::domain::vocabulary::Vocabulary;
use crate::infra::checkpoint::{CheckpointManager, CheckpointMeta};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluator::{self, EvalReport};
use crate::ml::model::{CharLstmConfig, CharLstmModel};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type ValidBackend = burn::backend::Wgpu;

// ─── Early stopping ───────────────────────────────────────────────────────────
/// Tracks the best validation loss and the epochs waited since the
/// last strict improvement.
pub struct EarlyStopping {
    best: f64,
    wait: usize,
    patience: usize,
}

/// Outcome of observing one epoch's validation loss.
#[derive(Debug, PartialEq, Eq)]
pub enum StopDecision {
    /// Strict improvement — checkpoint now.
    Improved,
    /// No improvement yet; the payload is the current wait count.
    Wait(usize),
    /// The wait counter reached patience — stop iterating epochs.
    Stop,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { best: f64::INFINITY, wait: 0, patience }
    }

    pub fn observe(&mut self, val_loss: f64) -> StopDecision {
        if val_loss < self.best {
            self.best = val_loss;
            self.wait = 0;
            StopDecision::Improved
        } else {
            self.wait += 1;
            if self.wait >= self.patience {
                StopDecision::Stop
            } else {
                StopDecision::Wait(self.wait)
            }
        }
    }

    pub fn best(&self) -> f64 {
        self.best
    }
}

// ─── Training outcome ─────────────────────────────────────────────────────────
/// Plain-data result handed back to the application layer.
pub struct TrainingOutcome {
    pub best_val_loss: f64,
    pub report: EvalReport,
    /// Final stamped weights file
    pub model_path: PathBuf,
    /// Final stamped checkpoint metadata file
    pub meta_path: PathBuf,
}

// ─── Training entry point ─────────────────────────────────────────────────────
#[allow(clippy::too_many_arguments)]
pub fn run_training(
    cfg: &TrainConfig,
    train_dataset: WindowDataset,
    val_dataset: WindowDataset,
    test_dataset: WindowDataset,
    vocab: &Vocabulary,
    run_ckpts: &CheckpointManager,
    final_ckpts: &CheckpointManager,
    final_stem: &str,
    metrics: &MetricsLogger,
) -> Result<TrainingOutcome> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    // ── Train ─────────────────────────────────────────────────────────────────
    let (model, best_val_loss) = train_loop(
        cfg,
        train_dataset,
        val_dataset,
        vocab,
        run_ckpts,
        metrics,
        device.clone(),
    )?;

    // ── Evaluate the held-out split on the inference backend ──────────────────
    let report = evaluator::evaluate(
        &model.valid(),
        test_dataset,
        cfg.batch_size,
        device,
    )?;
    println!(
        "Test: loss={:.4} | perplexity={:.2} | accuracy={:.2}%",
        report.avg_loss,
        report.perplexity,
        report.accuracy * 100.0,
    );

    // ── Export the final stamped artifact, then drop the recovery point ───────
    let meta = run_ckpts.load_temp_meta()?.finalized();
    let (model_path, meta_path) = final_ckpts.save_stamped(final_stem, &model, &meta)?;
    run_ckpts.remove_temp()?;
    tracing::info!("Final model saved to '{}'", model_path.display());

    Ok(TrainingOutcome { best_val_loss, report, model_path, meta_path })
}

fn train_loop(
    cfg: &TrainConfig,
    train_dataset: WindowDataset,
    val_dataset: WindowDataset,
    vocab: &Vocabulary,
    ckpt_manager: &CheckpointManager,
    metrics: &MetricsLogger,
    device: burn::backend::wgpu::WgpuDevice,
) -> Result<(CharLstmModel<TrainBackend>, f64)> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = CharLstmConfig::new(
        vocab.size(),
        cfg.embedding_dim,
        cfg.hidden_dim,
        cfg.num_layers,
    );
    let mut model: CharLstmModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} layers, embedding_dim={}, hidden_dim={}, vocab_size={}",
        cfg.num_layers, cfg.embedding_dim, cfg.hidden_dim, vocab.size(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = WindowBatcher::<TrainBackend>::new(device.clone());
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = WindowBatcher::<ValidBackend>::new(device.clone());
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut stopping = EarlyStopping::new(cfg.patience);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.inputs, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = train_loss_sum / train_batches.max(1) as f64;
        let train_ppl = avg_train_loss.exp();

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let mut val_loss_sum = 0.0f64;
        let mut val_batches = 0usize;

        for batch in val_loader.iter() {
            let logits = model_valid.forward(batch.inputs);
            let [batch_size, seq_len, vocab_size] = logits.dims();

            let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
            let loss = ce.forward(
                logits.reshape([batch_size * seq_len, vocab_size]),
                batch.targets.reshape([batch_size * seq_len]),
            );

            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches += 1;
        }

        let avg_val_loss = val_loss_sum / val_batches.max(1) as f64;
        let val_ppl = avg_val_loss.exp();

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} (ppl {:.2}) | val_loss={:.4} (ppl {:.2})",
            epoch, cfg.epochs, avg_train_loss, train_ppl, avg_val_loss, val_ppl,
        );
        metrics.log(&EpochMetrics {
            epoch,
            train_loss: avg_train_loss,
            train_ppl,
            val_loss: avg_val_loss,
            val_ppl,
        })?;

        // Training on a non-finite loss would only propagate garbage
        if !avg_train_loss.is_finite() || !avg_val_loss.is_finite() {
            return Err(ModelError::NumericDivergence { epoch }.into());
        }

        // ── Checkpoint decision ───────────────────────────────────────────────
        match stopping.observe(avg_val_loss) {
            StopDecision::Improved => {
                let meta = CheckpointMeta::new(vocab, cfg, epoch, avg_val_loss);
                ckpt_manager.save_temp(&model, &meta)?;
                println!("  ** Validation improved, temporary checkpoint saved.");
            }
            StopDecision::Wait(wait) => {
                println!("  ** No improvement ({}/{})", wait, cfg.patience);
            }
            StopDecision::Stop => {
                println!("  ** No improvement ({0}/{0})", cfg.patience);
                println!("Early stopping triggered.");
                break;
            }
        }
    }

    // ── Finalize: reload the best checkpoint's weights ────────────────────────
    let meta = ckpt_manager
        .load_temp_meta()
        .context("no temporary checkpoint was written — validation never improved")?;
    let model = ckpt_manager.load_temp_weights(model, &device)?;
    tracing::info!(
        "Loaded best model from checkpoint (epoch {})",
        meta.epoch.unwrap_or_default(),
    );

    println!("Training finished. Best Validation Loss: {:.4}", stopping.best());

    Ok((model, stopping.best()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_stopping_on_plateau() {
        // Validation losses [5, 4, 4, 4] with patience 2:
        // epoch 1 improves, epoch 2 improves, epochs 3-4 wait,
        // the second wait stops the loop after the 4th epoch —
        // the checkpoint kept is the one from epoch 2.
        let mut stopping = EarlyStopping::new(2);
        assert_eq!(stopping.observe(5.0), StopDecision::Improved);
        assert_eq!(stopping.observe(4.0), StopDecision::Improved);
        assert_eq!(stopping.observe(4.0), StopDecision::Wait(1));
        assert_eq!(stopping.observe(4.0), StopDecision::Stop);
        assert_eq!(stopping.best(), 4.0);
    }

    #[test]
    fn test_improvement_must_be_strict() {
        let mut stopping = EarlyStopping::new(3);
        assert_eq!(stopping.observe(2.0), StopDecision::Improved);
        // Equal loss is not an improvement
        assert_eq!(stopping.observe(2.0), StopDecision::Wait(1));
        // A genuine improvement resets the counter
        assert_eq!(stopping.observe(1.9), StopDecision::Improved);
        assert_eq!(stopping.observe(2.5), StopDecision::Wait(1));
    }

    #[test]
    fn test_patience_one_stops_immediately() {
        let mut stopping = EarlyStopping::new(1);
        assert_eq!(stopping.observe(3.0), StopDecision::Improved);
        assert_eq!(stopping.observe(3.1), StopDecision::Stop);
    }
}
