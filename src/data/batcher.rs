// ============================================================
// Layer 4 - Note Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<NoteSample>
// into tensors for the LSTM.
//
//   Input:  N samples, each with window_len ids and one target
//   Output: inputs  [N, window_len, 1]   ids / vocab_size
//           targets [N, vocab_size]      one-hot
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::NoteSample;
use crate::data::encoder::{normalize, one_hot};

// ─── NoteBatch ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct NoteBatch<B: Backend> {
    /// Normalised windows - shape: [batch_size, window_len, 1]
    pub inputs: Tensor<B, 3>,

    /// One-hot next tokens - shape: [batch_size, vocab_size]
    pub targets: Tensor<B, 2>,
}

// ─── NoteBatcher ──────────────────────────────────────────────────────────────
/// Holds the vocabulary size both encodings are computed against.
#[derive(Clone, Debug)]
pub struct NoteBatcher {
    pub vocab_size: usize,
}

impl NoteBatcher {
    pub fn new(vocab_size: usize) -> Self {
        Self { vocab_size }
    }
}

impl<B: Backend> Batcher<B, NoteSample, NoteBatch<B>> for NoteBatcher {
    fn batch(&self, items: Vec<NoteSample>, device: &B::Device) -> NoteBatch<B> {
        let batch_size = items.len();
        // Every window has the same length
        let window_len = items[0].input_ids.len();

        let input_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| normalize(&s.input_ids, self.vocab_size))
            .collect();

        let target_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| one_hot(s.target_id, self.vocab_size))
            .collect();

        let inputs = Tensor::<B, 3>::from_data(
            TensorData::new(input_flat, [batch_size, window_len, 1]),
            device,
        );

        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(target_flat, [batch_size, self.vocab_size]),
            device,
        );

        NoteBatch { inputs, targets }
    }
}
