// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Extract (or reload) the token corpus  (Layers 4, 6)
//   Step 2: Build the vocabulary                  (Layer 3 - domain)
//   Step 3: Window the corpus into samples        (Layer 4 - data)
//   Step 4: Configure the model                   (Layer 5 - ml)
//   Step 5: Save config                           (Layer 6 - infra)
//   Step 6: Run training loop                     (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::application::extract_use_case::ExtractUseCase;
use crate::data::{
    dataset::NoteDataset,
    encoder::{SequenceEncoder, DEFAULT_WINDOW_LEN},
};
use crate::domain::{traits::TokenSource, vocabulary::Vocabulary};
use crate::infra::{checkpoint::CheckpointManager, corpus_store::CorpusStore};
use crate::ml::{
    model::NoteLstmConfig,
    trainer::{run_training, TrainingSummary},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every path and hyperparameter for one run.
// Saved next to the checkpoints as train_config.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub midi_dir:       String,
    pub corpus_path:    String,
    pub checkpoint_dir: String,
    pub reuse_corpus:   bool,
    pub window_len:     usize,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub hidden_size:    usize,
    pub dense_size:     usize,
    pub dropout:        f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            midi_dir:       "midi_files".to_string(),
            corpus_path:    "data/music.json".to_string(),
            checkpoint_dir: ".".to_string(),
            reuse_corpus:   false,
            window_len:     DEFAULT_WINDOW_LEN,
            epochs:         100,
            batch_size:     64,
            lr:             1e-3,
            hidden_size:    512,
            dense_size:     256,
            dropout:        0.2,
            seed:           42,
        }
    }
}

impl TrainConfig {
    /// Reject settings no run could train with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.window_len > 0, "window_len must be at least 1");
        ensure!(self.batch_size > 0, "batch_size must be at least 1");
        Ok(())
    }

    /// Architecture for a corpus with `vocab_size` distinct tokens.
    pub fn model_config(&self, vocab_size: usize) -> NoteLstmConfig {
        NoteLstmConfig::new(vocab_size)
            .with_hidden_size(self.hidden_size)
            .with_dense_size(self.dense_size)
            .with_dropout(self.dropout)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Prepare everything training needs, stopping short of fitting.
    fn prepare(&self) -> Result<(NoteDataset, NoteLstmConfig, usize)> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Token corpus ──────────────────────────────────────────────
        let store  = CorpusStore::new(&cfg.corpus_path);
        let tokens = if cfg.reuse_corpus && store.exists() {
            store.load_all()?
        } else {
            ExtractUseCase::new(&cfg.midi_dir, &cfg.corpus_path).execute()?
        };
        ensure!(!tokens.is_empty(), "No notes found in '{}'", cfg.midi_dir);

        // ── Step 2: Vocabulary ────────────────────────────────────────────────
        let vocab = Vocabulary::from_tokens(&tokens);
        tracing::info!("Vocabulary: {} distinct tokens", vocab.len());

        // ── Step 3: Windows ───────────────────────────────────────────────────
        let samples = SequenceEncoder::new(cfg.window_len)?.encode(&tokens, &vocab)?;
        ensure!(
            !samples.is_empty(),
            "Corpus has {} tokens, need more than window_len ({})",
            tokens.len(),
            cfg.window_len,
        );
        tracing::info!("Data preprocessing done: {} windows", samples.len());

        // ── Step 4: Model architecture ────────────────────────────────────────
        let model_cfg = cfg.model_config(vocab.len());
        model_cfg.check_vocab(vocab.len())?;

        Ok((NoteDataset::new(samples), model_cfg, vocab.len()))
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = &self.config;
        let (dataset, model_cfg, vocab_size) = self.prepare()?;

        // ── Step 5: Save config for later generation ──────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg, &model_cfg)?;

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, &model_cfg, dataset, vocab_size, &ckpt_manager)
    }
}
