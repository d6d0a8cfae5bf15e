// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves model weights whenever an epoch beats the best loss so
// far, plus the metadata a later generator needs.
//
// File layout in the checkpoint directory:
//   weights-improvement-01-4.1873-bigger.bin   ← first epoch
//   weights-improvement-03-3.9022-bigger.bin   ← next improvement
//   ...
//   best_checkpoint.json   ← epoch, loss, and file of the best one
//   train_config.json      ← run configuration
//   model_config.json      ← NoteLstmConfig to rebuild the model
//
// Weights are serialised with Burn's BinBytesRecorder and
// written under the exact templated name.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{NoteLstmConfig, NoteLstmModel};

type WeightsRecorder = BinBytesRecorder<FullPrecisionSettings>;

/// Template: weights-improvement-{epoch:02}-{loss:.4}-bigger.bin
pub fn checkpoint_file_name(epoch: usize, loss: f64) -> String {
    format!("weights-improvement-{epoch:02}-{loss:.4}-bigger.bin")
}

/// Pointer to the most recent improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestCheckpoint {
    pub epoch: usize,
    pub loss:  f64,
    pub file:  String,
}

/// Tracks the lowest loss seen; only strict improvements count.
#[derive(Debug, Clone)]
pub struct BestLossTracker {
    best: f64,
}

impl Default for BestLossTracker {
    fn default() -> Self {
        Self { best: f64::INFINITY }
    }
}

impl BestLossTracker {
    /// Record `loss` and report whether it is a new minimum.
    /// NaN never improves.
    pub fn improves(&mut self, loss: f64) -> bool {
        if loss < self.best {
            self.best = loss;
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> f64 { self.best }
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create the manager, making the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// Write the weights for an improved epoch and update best_checkpoint.json.
    pub fn save_improvement<B: Backend>(
        &self,
        model: &NoteLstmModel<B>,
        epoch: usize,
        loss:  f64,
    ) -> Result<PathBuf> {
        let file = checkpoint_file_name(epoch, loss);
        let path = self.dir.join(&file);

        let bytes = Recorder::<B>::record(&WeightsRecorder::default(), model.clone().into_record(), ())
            .with_context(|| format!("Failed to serialise weights for epoch {epoch}"))?;
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let best = BestCheckpoint { epoch, loss, file };
        fs::write(
            self.dir.join("best_checkpoint.json"),
            serde_json::to_string_pretty(&best)?,
        )
        .with_context(|| "Failed to write best_checkpoint.json")?;

        tracing::debug!("Saved checkpoint: {}", path.display());
        Ok(path)
    }

    /// Restore weights from a checkpoint file into `model`.
    pub fn load_model<B: Backend>(
        &self,
        model:  NoteLstmModel<B>,
        file:   &str,
        device: &B::Device,
    ) -> Result<NoteLstmModel<B>> {
        let path  = self.dir.join(file);
        let bytes = fs::read(&path)
            .with_context(|| format!("Cannot read checkpoint '{}'", path.display()))?;

        let record = Recorder::<B>::load(&WeightsRecorder::default(), bytes, device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    /// Read best_checkpoint.json
    pub fn best_checkpoint(&self) -> Result<BestCheckpoint> {
        let path = self.dir.join("best_checkpoint.json");
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'. Has training saved a checkpoint?", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save the run configuration and the model architecture.
    pub fn save_config(&self, cfg: &TrainConfig, model_cfg: &NoteLstmConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        let path = self.dir.join("model_config.json");
        model_cfg
            .save(&path)
            .with_context(|| format!("Cannot write model config to '{}'", path.display()))?;

        tracing::debug!("Saved run configuration to '{}'", self.dir.display());
        Ok(())
    }

    pub fn load_model_config(&self) -> Result<NoteLstmConfig> {
        let path = self.dir.join("model_config.json");
        NoteLstmConfig::load(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read model config '{}': {e}", path.display()))
    }
}
