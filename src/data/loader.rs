// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads the raw training corpus from a dataset file.
//
// Two formats are accepted:
//   .csv — the first column of every record is a text row
//          (headers are auto-detected and skipped)
//   .txt — one text row per line
//
// An unreadable path or a file with zero non-empty rows is a
// corpus error, surfaced before any model work starts.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::error::ModelError;
use crate::domain::traits::CorpusSource;

/// Loads corpus rows from a CSV or plain-text file.
/// Implements the CorpusSource trait from Layer 3.
pub struct CsvCorpusLoader {
    path: String,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_rows(&self) -> Result<Vec<String>> {
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(ModelError::CorpusError(format!(
                "dataset file '{}' does not exist",
                self.path
            ))
            .into());
        }

        let rows = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => load_csv(path)?,
            _ => load_lines(path)?,
        };

        if rows.is_empty() {
            return Err(ModelError::CorpusError(format!(
                "dataset file '{}' contains no text rows",
                self.path
            ))
            .into());
        }

        tracing::info!("Loaded {} corpus rows from '{}'", rows.len(), self.path);
        Ok(rows)
    }
}

/// Read the first column of every CSV record.
fn load_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot open CSV '{}'", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("malformed CSV in '{}'", path.display()))?;
        if let Some(cell) = record.get(0) {
            let cell = cell.trim();
            if !cell.is_empty() {
                rows.push(cell.to_string());
            }
        }
    }
    Ok(rows)
}

/// Read one row per line from a plain-text file.
fn load_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_corpus_error() {
        let loader = CsvCorpusLoader::new("/nonexistent/corpus.csv");
        let err = loader.load_rows().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::CorpusError(_))
        ));
    }

    #[test]
    fn test_csv_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "sentence,target").unwrap();
        writeln!(f, "កខគ,កខគ").unwrap();
        writeln!(f, "ឃងច,ឃងច").unwrap();

        let rows = CsvCorpusLoader::new(path.to_str().unwrap())
            .load_rows()
            .unwrap();
        assert_eq!(rows, vec!["កខគ", "ឃងច"]);
    }

    #[test]
    fn test_txt_one_row_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(&path, "កខគ\n\nឃងច\n").unwrap();

        let rows = CsvCorpusLoader::new(path.to_str().unwrap())
            .load_rows()
            .unwrap();
        assert_eq!(rows, vec!["កខគ", "ឃងច"]);
    }

    #[test]
    fn test_empty_file_is_corpus_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let err = CsvCorpusLoader::new(path.to_str().unwrap())
            .load_rows()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::CorpusError(_))
        ));
    }
}
