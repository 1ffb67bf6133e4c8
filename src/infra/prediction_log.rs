// ============================================================
// Layer 6 — Prediction Log
// ============================================================
// File-backed PredictionSink: appends one JSON line per
// (input, output) prediction pair.
//
// The sink is fire-and-forget from the serving paths' point of
// view — callers log a warning on failure and return the response
// anyway. This module only provides the persistence; the isolation
// lives at the call site.
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::traits::PredictionSink;

#[derive(Debug, Serialize)]
struct PredictionRecord<'a> {
    input: &'a str,
    output: &'a str,
}

/// Appends predictions to a JSON-lines file.
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("cannot create prediction log directory '{}'", parent.display())
            })?;
        }
        Ok(Self { path })
    }
}

impl PredictionSink for PredictionLog {
    fn record(&self, input: &str, output: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open prediction log '{}'", self.path.display()))?;

        let line = serde_json::to_string(&PredictionRecord { input, output })?;
        writeln!(f, "{line}")
            .with_context(|| format!("cannot append to prediction log '{}'", self.path.display()))?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_one_json_line_per_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.jsonl");
        let log = PredictionLog::new(&path).unwrap();

        log.record("សួស្តី", "សួស្តីបាទ").unwrap();
        log.record("ក", "ខ").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["input"], "សួស្តី");
        assert_eq!(first["output"], "សួស្តីបាទ");
    }
}
