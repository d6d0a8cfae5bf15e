// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from raw .mid files to tensor batches:
//
//   .mid files
//       │
//       ▼
//   MidiLoader        → note / chord tokens, in corpus order
//       │
//       ▼
//   Vocabulary        → sorted token → id map (domain layer)
//       │
//       ▼
//   SequenceEncoder   → overlapping windows + next-token targets
//       │
//       ▼
//   NoteDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   NoteBatcher       → normalised inputs, one-hot targets
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads .mid files from a directory using midly
pub mod loader;

/// Windows the token stream into training samples
pub mod encoder;

/// Implements Burn's Dataset trait for note windows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
