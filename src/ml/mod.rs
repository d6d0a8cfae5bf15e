// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All network code lives here:
//
//   model.rs    - NoteLstmModel: three stacked LSTMs, a dense
//                 layer and a softmax head over the vocabulary
//
//   trainer.rs  - Forward pass, cross-entropy loss, backward
//                 pass, RMSProp step, best-loss checkpointing
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Hochreiter & Schmidhuber (1997) Long Short-Term Memory

/// Stacked LSTM next-token model
pub mod model;

/// Training loop with best-loss checkpointing
pub mod trainer;
