// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The application layer asks for tokens through TokenSource and
// never sees where they came from:
//
//   - MidiLoader   → parses a directory of .mid files
//   - CorpusStore  → reads a token list saved by an earlier run
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::token::Token;

// ─── TokenSource ──────────────────────────────────────────────────────────────
/// Any component that can produce the ordered token corpus.
pub trait TokenSource {
    /// Load every token, in corpus order.
    fn load_all(&self) -> Result<Vec<Token>>;
}
