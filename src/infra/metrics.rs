// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records one CSV row per training epoch.
//
// Output file: <checkpoint_dir>/metrics.csv
//
//   epoch,loss,best_loss,saved
//   1,4.187340,4.187340,true
//   2,4.201177,4.187340,false
//   3,3.902215,3.902215,true
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean categorical cross-entropy over the epoch's batches
    pub loss: f64,

    /// Lowest epoch loss so far, this epoch included
    pub best_loss: f64,

    /// Whether a checkpoint was written for this epoch
    pub saved: bool,
}

impl EpochMetrics {
    pub fn new(epoch: usize, loss: f64, best_loss: f64, saved: bool) -> Self {
        Self { epoch, loss, best_loss, saved }
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics.csv in `dir`, header included.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,loss,best_loss,saved")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{:.6},{}", m.epoch, m.loss, m.best_loss, m.saved)?;
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
    fn test_rows_are_appended_after_header() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 4.5, 4.5, true)).unwrap();
        logger.log(&EpochMetrics::new(2, 4.75, 4.5, false)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(
            csv,
            "epoch,loss,best_loss,saved\n\
             1,4.500000,4.500000,true\n\
             2,4.750000,4.500000,false\n"
        );
    }
}
