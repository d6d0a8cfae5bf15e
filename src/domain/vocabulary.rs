// ============================================================
// Layer 3 - Vocabulary
// ============================================================
// Bijective mapping between distinct corpus tokens and the
// integer ids 0..V-1 the network works with.
//
// Ids follow lexicographic order of the token strings, so the
// same corpus always produces the same mapping:
//
//   tokens:  ["E4", "0.4.7", "C4", "E4"]
//   sorted:  ["0.4.7", "C4", "E4"]
//   ids:       0        1     2
//
// Reference: Rust Book §8 (Hash Maps)

use std::collections::{BTreeSet, HashMap};

use crate::domain::token::Token;

#[derive(Debug, Clone)]
pub struct Vocabulary {
    tokens: Vec<Token>,
    index:  HashMap<Token, usize>,
}

impl Vocabulary {
    /// Sorted set of `tokens`, numbered from zero.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let sorted: BTreeSet<&Token> = tokens.iter().collect();
        let tokens: Vec<Token> = sorted.into_iter().cloned().collect();
        let index = tokens
            .iter()
            .enumerate()
            .map(|(id, tok)| (tok.clone(), id))
            .collect();
        Self { tokens, index }
    }

    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn id_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn token_of(&self, id: usize) -> Option<&str> {
        self.tokens.get(id).map(String::as_str)
    }

    /// All tokens in id order
    pub fn tokens(&self) -> &[Token] { &self.tokens }
}
