// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// The three subcommands: `train`, `generate` and `convert`,
// with every configurable flag.
//
// clap's derive macros generate help text, missing-argument
// errors and type conversion automatically.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a character LSTM on a Khmer text corpus
    Train(TrainArgs),

    /// Continue a seed text with a trained checkpoint
    Generate(GenerateArgs),

    /// Convert Khmer text to the royal register
    Convert(ConvertArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus file: .csv (first column) or .txt (one row per line)
    #[arg(long)]
    pub dataset_path: String,

    /// Base directory for per-run temporary checkpoints
    #[arg(long, default_value = "temp_checkpoints")]
    pub temp_dir: String,

    /// Directory for the final model and vocabulary artifacts
    #[arg(long, default_value = "saved_models")]
    pub models_dir: String,

    /// Maximum characters per sentence chunk before windowing
    #[arg(long, default_value_t = 120)]
    pub chunk_size: usize,

    /// Window length of each training sample
    #[arg(long, default_value_t = 50)]
    pub seq_len: usize,

    /// Number of windows processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Maximum number of full passes through the training windows
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Size of each character's embedding vector
    #[arg(long, default_value_t = 128)]
    pub embedding_dim: usize,

    /// Hidden dimension of each LSTM layer
    #[arg(long, default_value_t = 256)]
    pub hidden_dim: usize,

    /// Number of stacked LSTM layers
    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Epochs without validation improvement before early stopping
    #[arg(long, default_value_t = 3)]
    pub patience: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 — the
/// application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path: a.dataset_path,
            temp_dir: a.temp_dir,
            models_dir: a.models_dir,
            chunk_size: a.chunk_size,
            seq_len: a.seq_len,
            batch_size: a.batch_size,
            epochs: a.epochs,
            lr: a.lr,
            embedding_dim: a.embedding_dim,
            hidden_dim: a.hidden_dim,
            num_layers: a.num_layers,
            patience: a.patience,
        }
    }
}

/// All arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Seed text to continue from
    #[arg(long)]
    pub text: String,

    /// Number of characters to generate beyond the seed
    #[arg(long, default_value_t = 100)]
    pub length: usize,

    /// Context window fed to the model at each step
    #[arg(long, default_value_t = 50)]
    pub seq_len: usize,

    /// Checkpoint metadata file (.json) to load
    #[arg(long)]
    pub checkpoint: String,

    /// Prediction log file; pass --no-log to disable
    #[arg(long, default_value = "predictions.jsonl")]
    pub predictions_log: String,

    /// Disable prediction logging
    #[arg(long, default_value_t = false)]
    pub no_log: bool,
}

/// All arguments for the `convert` command.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Khmer text to convert to the royal register
    #[arg(long)]
    pub text: String,

    /// Checkpoint metadata file (.json) to load
    #[arg(long)]
    pub checkpoint: String,

    /// Prediction log file; pass --no-log to disable
    #[arg(long, default_value = "predictions.jsonl")]
    pub predictions_log: String,

    /// Disable prediction logging
    #[arg(long, default_value_t = false)]
    pub no_log: bool,
}
