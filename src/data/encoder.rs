// ============================================================
// Layer 4 - Sequence Encoder
// ============================================================
// Slices the token stream into overlapping windows, each paired
// with the token that follows it.
//
// Example with window_len = 2:
//   Tokens:   A B A C A B
//   Window 0: (A, B) → A
//   Window 1: (B, A) → C
//   Window 2: (A, C) → A
//   Window 3: (C, A) → B
//
// A stream of N tokens yields N - window_len windows.
//
// Network-facing encodings:
//   input  → id / vocab_size        (one f32 per time step)
//   target → one-hot over vocab_size
//
// The divisor is the vocabulary size, not the largest id, so
// inputs land in [0, (V-1)/V].
//
// Reference: Rust Book §8 (Slices)

use anyhow::{anyhow, ensure, Result};

use crate::data::dataset::NoteSample;
use crate::domain::{token::Token, vocabulary::Vocabulary};

/// Number of preceding tokens used to predict the next one
pub const DEFAULT_WINDOW_LEN: usize = 50;

pub struct SequenceEncoder {
    window_len: usize,
}

impl SequenceEncoder {
    /// Fails if `window_len` is zero.
    pub fn new(window_len: usize) -> Result<Self> {
        ensure!(window_len > 0, "window_len must be at least 1");
        Ok(Self { window_len })
    }

    pub fn window_len(&self) -> usize { self.window_len }

    /// Turn `tokens` into one sample per window.
    /// Fails if a token is missing from `vocab`.
    pub fn encode(&self, tokens: &[Token], vocab: &Vocabulary) -> Result<Vec<NoteSample>> {
        let ids: Vec<usize> = tokens
            .iter()
            .map(|t| vocab.id_of(t).ok_or_else(|| anyhow!("Token '{t}' is not in the vocabulary")))
            .collect::<Result<_>>()?;

        if ids.len() <= self.window_len {
            return Ok(Vec::new());
        }

        Ok(ids
            .windows(self.window_len + 1)
            .map(|w| NoteSample {
                input_ids: w[..self.window_len].to_vec(),
                target_id: w[self.window_len],
            })
            .collect())
    }
}

/// Scale ids into the network's input range.
pub fn normalize(ids: &[usize], vocab_size: usize) -> Vec<f32> {
    let scale = vocab_size as f32;
    ids.iter().map(|&id| id as f32 / scale).collect()
}

/// One-hot vector of width `vocab_size` with a 1 at `id`.
pub fn one_hot(id: usize, vocab_size: usize) -> Vec<f32> {
    let mut v = vec![0.0; vocab_size];
    v[id] = 1.0;
    v
}
