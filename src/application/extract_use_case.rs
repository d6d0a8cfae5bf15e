// ============================================================
// Layer 2 - ExtractUseCase
// ============================================================
// Stage 1 of the pipeline on its own:
//
//   Step 1: Parse every .mid file into tokens   (Layer 4 - data)
//   Step 2: Overwrite the saved corpus          (Layer 6 - infra)

use anyhow::Result;

use crate::data::loader::MidiLoader;
use crate::domain::{token::Token, traits::TokenSource};
use crate::infra::corpus_store::CorpusStore;

pub struct ExtractUseCase {
    midi_dir:    String,
    corpus_path: String,
}

impl ExtractUseCase {
    pub fn new(midi_dir: impl Into<String>, corpus_path: impl Into<String>) -> Self {
        Self { midi_dir: midi_dir.into(), corpus_path: corpus_path.into() }
    }

    /// Extract the corpus, persist it, and hand it back.
    pub fn execute(&self) -> Result<Vec<Token>> {
        tracing::info!("Extracting notes from '{}'", self.midi_dir);
        let tokens = MidiLoader::new(&self.midi_dir).load_all()?;

        CorpusStore::new(&self.corpus_path).save(&tokens)?;
        tracing::info!("Data extracted");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::{
        num::u4, Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
    };
    use std::path::Path;

    /// One-track file striking `keys` one after another on channel 0.
    fn write_midi(path: &Path, keys: &[u8]) {
        let mut track: Vec<TrackEvent<'static>> = keys
            .iter()
            .map(|&key| TrackEvent {
                delta: 480.into(),
                kind:  TrackEventKind::Midi {
                    channel: u4::new(0),
                    message: MidiMessage::NoteOn { key: key.into(), vel: 90.into() },
                },
            })
            .collect();
        track.push(TrackEvent {
            delta: 0.into(),
            kind:  TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        Smf {
            header: Header::new(Format::SingleTrack, Timing::Metrical(480.into())),
            tracks: vec![track],
        }
        .save(path)
        .unwrap();
    }

    #[test]
    fn test_execute_saves_tokens_and_overwrites() {
        let dir      = tempfile::tempdir().unwrap();
        let midi_dir = dir.path().join("midi_files");
        let corpus   = dir.path().join("data").join("music.json");
        std::fs::create_dir(&midi_dir).unwrap();
        write_midi(&midi_dir.join("song.mid"), &[60, 62, 64]);

        let use_case = ExtractUseCase::new(
            midi_dir.to_string_lossy(),
            corpus.to_string_lossy(),
        );
        let tokens = use_case.execute().unwrap();
        assert_eq!(tokens, vec!["C4", "D4", "E4"]);
        assert_eq!(CorpusStore::new(&corpus).load_all().unwrap(), tokens);

        write_midi(&midi_dir.join("song.mid"), &[69]);
        let tokens = use_case.execute().unwrap();
        assert_eq!(tokens, vec!["A4"]);
        assert_eq!(CorpusStore::new(&corpus).load_all().unwrap(), vec!["A4"]);
    }
}
