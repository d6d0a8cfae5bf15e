// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//
// Reference: Clean Architecture pattern

// MIDI → token corpus on disk
pub mod extract_use_case;

// The full training workflow
pub mod train_use_case;
