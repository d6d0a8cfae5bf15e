// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types for the musical side of the system.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Note / chord events and their string tokens
pub mod token;

// Sorted token → id mapping
pub mod vocabulary;

// Core abstractions other layers implement
pub mod traits;
