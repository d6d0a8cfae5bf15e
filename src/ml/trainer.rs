// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Fits the LSTM on every window for a fixed number of epochs
// using Burn's DataLoader and RMSProp.
//
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - Epoch loss = per-sample mean over the epoch, so a short
//     final batch weighs only as much as its windows
//   - A checkpoint is written only when the epoch loss is a
//     new minimum (monitor = loss, mode = min)
//   - No validation split, no early stopping
//
// Reference: Burn Book §5 (Custom Training Loop)
//            Hinton, Coursera Lecture 6e (RMSProp)

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{GradientsParams, Optimizer, RmsPropConfig},
    tensor::{backend::AutodiffBackend, ElementConversion},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{NoteBatch, NoteBatcher},
    dataset::{NoteDataset, NoteSample},
};
use crate::infra::{
    checkpoint::{BestCheckpoint, BestLossTracker, CheckpointManager},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{NoteLstmConfig, NoteLstmModel};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs:            usize,
    pub checkpoints_saved: usize,
    pub best:              Option<BestCheckpoint>,
}

/// Running per-sample mean of batch losses.
#[derive(Debug, Default, Clone, Copy)]
struct EpochLoss {
    weighted_sum: f64,
    samples:      usize,
}

impl EpochLoss {
    /// Record a batch whose mean loss is `loss` over `batch_len` windows.
    fn add(&mut self, loss: f64, batch_len: usize) {
        self.weighted_sum += loss * batch_len as f64;
        self.samples      += batch_len;
    }

    /// NaN for an epoch that saw no samples.
    fn mean(&self) -> f64 {
        if self.samples > 0 { self.weighted_sum / self.samples as f64 } else { f64::NAN }
    }
}

pub fn run_training(
    cfg:          &TrainConfig,
    model_cfg:    &NoteLstmConfig,
    dataset:      NoteDataset,
    vocab_size:   usize,
    ckpt_manager: &CheckpointManager,
) -> Result<TrainingSummary> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, model_cfg, dataset, vocab_size, ckpt_manager, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    model_cfg:    &NoteLstmConfig,
    dataset:      NoteDataset,
    vocab_size:   usize,
    ckpt_manager: &CheckpointManager,
    device:       B::Device,
) -> Result<TrainingSummary> {
    model_cfg.check_vocab(vocab_size)?;
    ensure!(dataset.sample_count() > 0, "No training windows to fit");

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: NoteLstmModel<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: 3 x LSTM({}), dense={}, vocab={}",
        model_cfg.hidden_size, model_cfg.dense_size, model_cfg.vocab_size,
    );

    // ── RMSProp optimiser ─────────────────────────────────────────────────────
    // v = α*v + (1-α)*g²
    // θ = θ - lr * g / (√v + ε)
    let optim_cfg = RmsPropConfig::new().with_alpha(0.9).with_epsilon(1e-7);
    let mut optim = optim_cfg.init();

    // ── Data loader ───────────────────────────────────────────────────────────
    let samples = dataset.sample_count();
    let batcher = NoteBatcher::new(vocab_size);
    let loader  = DataLoaderBuilder::<B, NoteSample, NoteBatch<B>>::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(dataset);
    tracing::info!("Training on {} windows, batch size {}", samples, cfg.batch_size);

    let metrics     = MetricsLogger::new(ckpt_manager.dir())?;
    let mut tracker = BestLossTracker::default();
    let mut best    = None;
    let mut saved   = 0usize;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut epoch_loss = EpochLoss::default();

        for batch in loader.iter() {
            let batch_len = batch.inputs.dims()[0];
            let loss = model.forward_loss(batch.inputs, batch.targets);

            epoch_loss.add(loss.clone().into_scalar().elem::<f64>(), batch_len);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let epoch_loss = epoch_loss.mean();

        let improved = tracker.improves(epoch_loss);
        if improved {
            let path = ckpt_manager.save_improvement(&model, epoch, epoch_loss)?;
            tracing::info!("Loss improved to {:.4}, saved '{}'", epoch_loss, path.display());
            best = Some(ckpt_manager.best_checkpoint()?);
            saved += 1;
        }

        metrics.log(&EpochMetrics::new(epoch, epoch_loss, tracker.best(), improved))?;

        println!(
            "Epoch {:>3}/{} | loss={:.4} | best={:.4}{}",
            epoch, cfg.epochs, epoch_loss, tracker.best(),
            if improved { " | saved" } else { "" },
        );
    }

    tracing::info!("Training complete!");
    Ok(TrainingSummary { epochs: cfg.epochs, checkpoints_saved: saved, best })
}
