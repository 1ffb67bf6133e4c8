// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Seams between the pipeline and its replaceable edges.
//
// By programming against these traits the application layer stays
// independent of file formats and persistence targets:
//   - CsvCorpusLoader implements CorpusSource
//   - (future) a database-backed loader could too
//   - PredictionLog implements PredictionSink
//   - (future) a database sink could replace the file log
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the raw training corpus rows.
///
/// Implementations:
///   - CsvCorpusLoader → first column of a CSV file, or lines of a .txt file
pub trait CorpusSource {
    /// Load every raw text row from this source.
    fn load_rows(&self) -> Result<Vec<String>>;
}

// ─── PredictionSink ───────────────────────────────────────────────────────────
/// Any component that can persist an (input, output) prediction pair.
///
/// Callers treat this as fire-and-forget: a failing sink is logged and
/// must never fail the serving request that produced the prediction.
pub trait PredictionSink {
    /// Record one prediction.
    fn record(&self, input: &str, output: &str) -> Result<()>;
}
