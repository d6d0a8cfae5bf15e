// ============================================================
// Layer 6 - Corpus Store
// ============================================================
// Persists the extracted token list as a JSON array.
//
// Every extraction overwrites the file. `train --reuse-corpus`
// reads it back instead of parsing the MIDI directory again.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::token::Token;
use crate::domain::traits::TokenSource;

pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool { self.path.is_file() }

    /// Write `tokens`, replacing any previous contents.
    pub fn save(&self, tokens: &[Token]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create '{}'", parent.display()))?;
            }
        }

        fs::write(&self.path, serde_json::to_string(tokens)?)
            .with_context(|| format!("Cannot write corpus to '{}'", self.path.display()))?;

        tracing::info!("Saved {} tokens to '{}'", tokens.len(), self.path.display());
        Ok(())
    }
}

impl TokenSource for CorpusStore {
    fn load_all(&self) -> Result<Vec<Token>> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus from '{}'", self.path.display()))?;
        let tokens: Vec<Token> = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt corpus file '{}'", self.path.display()))?;
        tracing::info!("Loaded {} tokens from '{}'", tokens.len(), self.path.display());
        Ok(tokens)
    }
}
