// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File-backed concerns shared by the use cases:
//
//   checkpoint.rs   - Best-loss weight checkpoints, plus the
//                     run and model configuration as JSON.
//
//   corpus_store.rs - The extracted token list as JSON.
//
//   metrics.rs      - One CSV row of loss data per epoch.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Token corpus persistence
pub mod corpus_store;

/// Training metrics CSV logger
pub mod metrics;
