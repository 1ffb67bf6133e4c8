// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends per-epoch training metrics to a CSV file so learning
// curves can be plotted after the run.
//
// Output file: {run_dir}/metrics.csv
//
//   epoch,train_loss,train_ppl,val_loss,val_ppl
//   1,4.812300,122.98,4.620100,101.51
//   2,4.103500,60.55,3.991200,54.12
//   ...
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One row of metrics for a single training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    /// Average cross-entropy over all training batches
    pub train_loss: f64,
    /// exp(train_loss)
    pub train_ppl: f64,
    /// Average cross-entropy over all validation batches
    pub val_loss: f64,
    /// exp(val_loss)
    pub val_ppl: f64,
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, writing the CSV header if the file is new.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,train_ppl,val_loss,val_ppl")?;
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new CSV row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{:.6},{:.2},{:.6},{:.2}",
            m.epoch, m.train_loss, m.train_ppl, m.val_loss, m.val_ppl,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger
            .log(&EpochMetrics {
                epoch: 1,
                train_loss: 4.5,
                train_ppl: 90.02,
                val_loss: 4.2,
                val_ppl: 66.69,
            })
            .unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,train_ppl,val_loss,val_ppl");
        assert!(lines[1].starts_with("1,4.500000,"));
    }

    #[test]
    fn test_reopening_appends_without_second_header() {
        let dir = tempfile::tempdir().unwrap();
        {
            let logger = MetricsLogger::new(dir.path()).unwrap();
            logger
                .log(&EpochMetrics {
                    epoch: 1,
                    train_loss: 4.0,
                    train_ppl: 54.6,
                    val_loss: 3.9,
                    val_ppl: 49.4,
                })
                .unwrap();
        }
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger
            .log(&EpochMetrics {
                epoch: 2,
                train_loss: 3.5,
                train_ppl: 33.1,
                val_loss: 3.4,
                val_ppl: 30.0,
            })
            .unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(content.matches("epoch,").count(), 1);
        assert_eq!(content.lines().count(), 3);
    }
}
