// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction, parsed with clap.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains a model on a Khmer corpus file
//   2. `generate` — continues a seed text from a checkpoint
//   3. `convert`  — rewrites text into the royal register
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use commands::{Commands, ConvertArgs, GenerateArgs, TrainArgs};

use crate::application::convert_use_case::ConvertUseCase;
use crate::application::generate_use_case::GenerateUseCase;
use crate::application::train_use_case::TrainUseCase;
use crate::domain::traits::PredictionSink;
use crate::infra::prediction_log::PredictionLog;
use crate::ml::handle::ModelHandle;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "khmer-rnn",
    version = "0.1.0",
    about = "Train a character-level LSTM on Khmer text, continue seed strings, \
             and convert text to the royal register."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This layer only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Generate(args) => run_generate(args),
            Commands::Convert(args) => run_convert(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on corpus: {}", args.dataset_path);

    let use_case = TrainUseCase::new(args.into());
    let summary = use_case.execute()?;

    println!("{}", summary.message);
    println!("Test perplexity: {:.2}", summary.test_perplexity);
    println!("Test accuracy:   {:.2}%", summary.test_accuracy * 100.0);
    println!("Model:      {}", summary.model_path);
    println!("Vocabulary: {}", summary.vocab_path);
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let handle = ModelHandle::empty();
    handle.load(Path::new(&args.checkpoint))?;

    let log = open_sink(&args.predictions_log, args.no_log)?;
    let use_case = GenerateUseCase::new(&handle, log.as_ref().map(|l| l as &dyn PredictionSink));

    let output = use_case.generate(&args.text, args.length, args.seq_len)?;
    println!("{output}");
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let handle = ModelHandle::empty();
    handle.load(Path::new(&args.checkpoint))?;

    let log = open_sink(&args.predictions_log, args.no_log)?;
    let use_case = ConvertUseCase::new(&handle, log.as_ref().map(|l| l as &dyn PredictionSink));

    let conversion = use_case.convert(&args.text)?;
    println!("Original: {}", conversion.original_text);
    println!("Cleaned:  {}", conversion.cleaned_text);
    println!("Royal:    {}", conversion.royal_text);
    Ok(())
}

fn open_sink(path: &str, disabled: bool) -> Result<Option<PredictionLog>> {
    if disabled {
        return Ok(None);
    }
    Ok(Some(PredictionLog::new(path)?))
}
