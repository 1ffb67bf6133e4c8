// ============================================================
// Layer 2 — Train Use Case
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load corpus rows            (Layer 4 - data)
//   Step 2: Normalize the text          (Layer 4 - data)
//   Step 3: Segment + chunk sentences   (Layer 4 - data)
//   Step 4: Build the vocabulary        (Layer 3 - domain)
//   Step 5: Split 80/10/10 by document  (Layer 4 - data)
//   Step 6: Window each split           (Layer 4 - data)
//   Step 7: Train, evaluate, export     (Layer 5 - ml, Layer 6 - infra)
//   Step 8: Save the vocabulary artifact (Layer 6 - infra)
//
// Every run gets a timestamp: the temporary checkpoint directory
// is stamped with it (two concurrent runs must never share a
// recovery path) and the final artifacts carry it in their names.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::WindowDataset,
    loader::CsvCorpusLoader,
    normalizer::Normalizer,
    segmenter,
    splitter::split_corpus,
};
use crate::domain::error::ModelError;
use crate::domain::traits::CorpusSource;
use crate::domain::vocabulary::Vocabulary;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger, vocab_store::VocabStore};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serializable so a run's
// settings can be archived next to its artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path: String,
    /// Base directory for per-run temporary checkpoints
    pub temp_dir: String,
    /// Directory for final stamped artifacts
    pub models_dir: String,
    pub chunk_size: usize,
    pub seq_len: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub lr: f64,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
    pub num_layers: usize,
    pub patience: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/corpus.csv".to_string(),
            temp_dir: "temp_checkpoints".to_string(),
            models_dir: "saved_models".to_string(),
            chunk_size: 120,
            seq_len: 50,
            batch_size: 32,
            epochs: 30,
            lr: 1e-3,
            embedding_dim: 128,
            hidden_dim: 256,
            num_layers: 2,
            patience: 3,
        }
    }
}

/// What a completed run reports back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSummary {
    pub message: String,
    pub test_perplexity: f64,
    pub test_accuracy: f64,
    pub model_path: String,
    pub vocab_path: String,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Load corpus rows ──────────────────────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.dataset_path);
        let rows = CsvCorpusLoader::new(&cfg.dataset_path).load_rows()?;

        // ── Step 2 + 3: Normalize, segment, chunk ─────────────────────────────
        // Long sentences are cut into contiguous pieces of at most
        // chunk_size characters before windowing bounds seq_len.
        let normalizer = Normalizer::new();
        let chunks: Vec<String> = rows
            .iter()
            .map(|row| normalizer.normalize(row))
            .flat_map(|clean| {
                segmenter::split_sentences(&clean)
                    .iter()
                    .flat_map(|sentence| segmenter::chunk(sentence, cfg.chunk_size))
                    .collect::<Vec<_>>()
            })
            .collect();
        tracing::info!("Prepared {} sentence chunks", chunks.len());

        // ── Step 4: Build the vocabulary ──────────────────────────────────────
        let vocab = Vocabulary::build(&chunks)?;
        tracing::info!("Vocabulary built: {} symbols", vocab.size());

        // ── Step 5: Document-level split, before any windowing ────────────────
        let (train_texts, val_texts, test_texts) = split_corpus(chunks);

        // ── Step 6: Window each split independently ───────────────────────────
        let train_dataset = WindowDataset::build(&train_texts, cfg.seq_len, &vocab);
        let val_dataset = WindowDataset::build(&val_texts, cfg.seq_len, &vocab);
        let test_dataset = WindowDataset::build(&test_texts, cfg.seq_len, &vocab);
        tracing::info!(
            "Windows: {} train, {} validation, {} test",
            train_dataset.sample_count(),
            val_dataset.sample_count(),
            test_dataset.sample_count(),
        );

        if train_dataset.sample_count() == 0 || val_dataset.sample_count() == 0 {
            return Err(ModelError::CorpusError(format!(
                "corpus too small: no windows of length {} in the train or validation split",
                cfg.seq_len
            ))
            .into());
        }

        // ── Step 7: Train, evaluate, export ───────────────────────────────────
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let run_ckpts = CheckpointManager::new(format!("{}/run_{timestamp}", cfg.temp_dir))?;
        let final_ckpts = CheckpointManager::new(&cfg.models_dir)?;
        let metrics = MetricsLogger::new(&cfg.models_dir)?;

        let outcome = run_training(
            cfg,
            train_dataset,
            val_dataset,
            test_dataset,
            &vocab,
            &run_ckpts,
            &final_ckpts,
            &format!("lstm_model_{timestamp}"),
            &metrics,
        )?;

        // ── Step 8: Save the vocabulary artifact ──────────────────────────────
        let vocab_path = VocabStore::new(&cfg.models_dir)?.save(&vocab, &timestamp)?;

        Ok(TrainSummary {
            message: "Training completed successfully.".to_string(),
            test_perplexity: outcome.report.perplexity,
            test_accuracy: outcome.report.accuracy,
            model_path: outcome.model_path.display().to_string(),
            vocab_path: vocab_path.display().to_string(),
        })
    }
}
