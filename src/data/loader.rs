// ============================================================
// Layer 4 - MIDI Loader
// ============================================================
// Loads .mid files from a directory using the midly crate and
// flattens each one into note / chord tokens.
//
// How a file becomes tokens:
//
//   Smf
//     └── tracks: Vec<Track>
//           └── TrackEvent { delta, kind }
//                 └── Midi { channel, NoteOn { key, vel } }
//
//   1. Each track is walked once, accumulating delta ticks into
//      absolute ticks. Every NoteOn with vel > 0 is an onset.
//   2. Onsets are kept per (track, channel) voice. Onsets sharing
//      a tick inside one voice form one event: a Note if one
//      distinct key, a Chord otherwise. Channel 10 is unpitched
//      percussion and yields nothing.
//   3. Voices are grouped by program (first ProgramChange on
//      their channel). If any program was found, only the first
//      group is used. Otherwise all voices are merged.
//   4. The chosen events are ordered by tick (track, then
//      channel order breaks ties) and mapped to their tokens.
//
// Files are visited in sorted order and any unreadable file
// aborts the load.
//
// Reference: midly crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use midly::{MidiMessage, Smf, Track, TrackEventKind};

use crate::domain::token::{NoteEvent, Token};
use crate::domain::traits::TokenSource;

/// MIDI channel 10, zero-based
const PERCUSSION_CHANNEL: u8 = 9;

/// Loads all .mid files from a given directory.
pub struct MidiLoader {
    /// Path to the directory containing .mid files
    dir: PathBuf,
}

impl MidiLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sorted list of the .mid files in the directory.
    fn midi_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            bail!("MIDI directory '{}' does not exist", self.dir.display());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("mid") {
                files.push(path);
            } else {
                tracing::debug!("Ignoring non-MIDI entry '{}'", path.display());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl TokenSource for MidiLoader {
    fn load_all(&self) -> Result<Vec<Token>> {
        let files = self.midi_files()?;
        if files.is_empty() {
            tracing::warn!("No .mid files found in '{}'", self.dir.display());
        }

        let mut tokens = Vec::new();
        for path in &files {
            let events = load_single_midi(path)?;
            tracing::debug!("Parsed: {} ({} events)", path.display(), events.len());
            tokens.extend(events.iter().map(NoteEvent::token));
        }

        tracing::info!(
            "Extracted {} tokens from {} MIDI files",
            tokens.len(),
            files.len()
        );
        Ok(tokens)
    }
}

/// Parse one .mid file into its ordered note / chord events.
pub fn load_single_midi(path: &Path) -> Result<Vec<NoteEvent>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let smf = Smf::parse(&bytes)
        .map_err(|e| anyhow::anyhow!("midly parse error in '{}': {}", path.display(), e))?;

    Ok(extract_events(&smf))
}

// ─── Instrument Partitioning ─────────────────────────────────────────────────

/// Onsets of one channel within one track, the smallest unit
/// that can carry a single instrument.
#[derive(Debug, Clone)]
struct Voice {
    /// First ProgramChange seen on this channel in this track
    program: Option<u8>,
    /// (absolute tick, event), ascending by tick
    events:  Vec<(u64, NoteEvent)>,
}

/// Voices sharing one program, in file order.
#[derive(Debug, Clone)]
struct InstrumentPart {
    program: Option<u8>,
    voices:  Vec<Voice>,
}

/// Turn a decoded file into its event stream.
pub fn extract_events(smf: &Smf) -> Vec<NoteEvent> {
    let voices: Vec<Voice> = smf.tracks.iter().flat_map(parse_track).collect();

    match partition_by_instrument(&voices) {
        Some(mut parts) => {
            let first = parts.remove(0);
            tracing::debug!(
                "Using first of {} instrument parts (program {:?})",
                parts.len() + 1,
                first.program
            );
            merge_by_tick(&first.voices)
        }
        None => merge_by_tick(&voices),
    }
}

/// Group voices by program, ordered by first appearance.
/// Returns None when no voice carries any program.
fn partition_by_instrument(voices: &[Voice]) -> Option<Vec<InstrumentPart>> {
    if voices.iter().all(|v| v.program.is_none()) {
        return None;
    }

    let mut parts: Vec<InstrumentPart> = Vec::new();
    for voice in voices {
        match parts.iter_mut().find(|p| p.program == voice.program) {
            Some(part) => part.voices.push(voice.clone()),
            None => parts.push(InstrumentPart {
                program: voice.program,
                voices:  vec![voice.clone()],
            }),
        }
    }
    Some(parts)
}

/// Flatten several voices into one stream ordered by tick.
/// The sort is stable so earlier voices win ties.
fn merge_by_tick(voices: &[Voice]) -> Vec<NoteEvent> {
    let mut all: Vec<&(u64, NoteEvent)> = voices.iter().flat_map(|v| v.events.iter()).collect();
    all.sort_by_key(|(tick, _)| *tick);
    all.into_iter().map(|(_, ev)| ev.clone()).collect()
}

/// Split one track into per-channel voices, ascending by channel.
/// Percussion hits carry no pitch and are dropped.
fn parse_track(track: &Track) -> Vec<Voice> {
    let mut tick: u64 = 0;
    let mut programs: [Option<u8>; 16] = [None; 16];
    let mut onsets: BTreeMap<u8, BTreeMap<u64, Vec<u8>>> = BTreeMap::new();

    for event in track {
        tick += u64::from(event.delta.as_int());

        if let TrackEventKind::Midi { channel, message } = &event.kind {
            let channel = channel.as_int();
            match message {
                MidiMessage::ProgramChange { program } => {
                    programs[usize::from(channel)].get_or_insert(program.as_int());
                }
                MidiMessage::NoteOn { key, vel }
                    if vel.as_int() > 0 && channel != PERCUSSION_CHANNEL =>
                {
                    onsets
                        .entry(channel)
                        .or_default()
                        .entry(tick)
                        .or_default()
                        .push(key.as_int());
                }
                _ => {}
            }
        }
    }

    onsets
        .into_iter()
        .map(|(channel, by_tick)| Voice {
            program: programs[usize::from(channel)],
            events:  by_tick
                .into_iter()
                .filter_map(|(tick, keys)| NoteEvent::from_keys(keys).map(|ev| (tick, ev)))
                .collect(),
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use midly::{num::u4, Format, Header, MetaMessage, Timing, TrackEvent};

    /// (delta ticks, event) pairs for one track
    type Spec = Vec<(u32, TrackEventKind<'static>)>;

    fn note_on(channel: u8, key: u8) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::NoteOn { key: key.into(), vel: 100.into() },
        }
    }

    fn note_off(channel: u8, key: u8) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::NoteOff { key: key.into(), vel: 0.into() },
        }
    }

    fn program(channel: u8, p: u8) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::ProgramChange { program: p.into() },
        }
    }

    fn build_smf(tracks: Vec<Spec>) -> Smf<'static> {
        let tracks = tracks
            .into_iter()
            .map(|spec| {
                let mut track: Vec<TrackEvent<'static>> = spec
                    .into_iter()
                    .map(|(delta, kind)| TrackEvent { delta: delta.into(), kind })
                    .collect();
                track.push(TrackEvent {
                    delta: 0.into(),
                    kind:  TrackEventKind::Meta(MetaMessage::EndOfTrack),
                });
                track
            })
            .collect();
        Smf {
            header: Header::new(Format::Parallel, Timing::Metrical(480.into())),
            tracks,
        }
    }

    fn tokens_of(smf: &Smf) -> Vec<Token> {
        extract_events(smf).iter().map(NoteEvent::token).collect()
    }

    /// C4 alone, then a C major triad, then E4
    fn melody(channel: u8) -> Spec {
        vec![
            (0,   note_on(channel, 60)),
            (480, note_off(channel, 60)),
            (0,   note_on(channel, 60)),
            (0,   note_on(channel, 64)),
            (0,   note_on(channel, 67)),
            (480, note_off(channel, 60)),
            (0,   note_off(channel, 64)),
            (0,   note_off(channel, 67)),
            (0,   note_on(channel, 64)),
            (480, note_off(channel, 64)),
        ]
    }

    #[test]
    fn test_notes_and_chords() {
        let smf = build_smf(vec![melody(0)]);
        assert_eq!(tokens_of(&smf), vec!["C4", "0.4.7", "E4"]);
    }

    #[test]
    fn test_zero_velocity_note_on_is_not_an_onset() {
        let spec = vec![
            (0,   note_on(0, 62)),
            (240, TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn { key: 62.into(), vel: 0.into() },
            }),
            (0,   note_on(0, 65)),
        ];
        let smf = build_smf(vec![spec]);
        assert_eq!(tokens_of(&smf), vec!["D4", "F4"]);
    }

    #[test]
    fn test_first_instrument_part_only() {
        // Piano plays the melody, violin plays G5 throughout
        let mut piano = vec![(0, program(0, 0))];
        piano.extend(melody(0));
        let violin = vec![
            (0, program(1, 40)),
            (0, note_on(1, 79)),
            (960, note_off(1, 79)),
        ];
        let smf = build_smf(vec![piano, violin]);
        assert_eq!(tokens_of(&smf), vec!["C4", "0.4.7", "E4"]);
    }

    #[test]
    fn test_tracks_of_same_instrument_are_merged() {
        let mut upper = vec![(0, program(0, 0))];
        upper.extend(melody(0));
        let lower = vec![
            (0,   program(1, 0)),
            (240, note_on(1, 48)),
            (240, note_off(1, 48)),
        ];
        let smf = build_smf(vec![upper, lower]);
        assert_eq!(tokens_of(&smf), vec!["C4", "C3", "0.4.7", "E4"]);
    }

    #[test]
    fn test_no_instruments_flattens_everything() {
        let upper = melody(0);
        let lower = vec![(0, note_on(1, 48)), (960, note_off(1, 48))];
        let smf = build_smf(vec![upper, lower]);
        // Simultaneous onsets in different tracks stay separate tokens
        assert_eq!(tokens_of(&smf), vec!["C4", "C3", "0.4.7", "E4"]);
    }

    #[test]
    fn test_percussion_is_dropped() {
        let drums = vec![(0, note_on(9, 36)), (120, note_off(9, 36))];
        let smf = build_smf(vec![drums, melody(0)]);
        assert_eq!(tokens_of(&smf), vec!["C4", "0.4.7", "E4"]);

        let only_drums = build_smf(vec![vec![(0, note_on(9, 36)), (0, note_on(9, 42))]]);
        assert!(tokens_of(&only_drums).is_empty());
    }

    #[test]
    fn test_single_track_keeps_channels_apart() {
        // Format 0: piano on ch0, violin on ch1, drums on ch9, all in one track
        let track = vec![
            (0,   program(0, 0)),
            (0,   program(1, 40)),
            (0,   note_on(9, 36)),
            (0,   note_on(0, 60)),
            (0,   note_on(1, 79)),
            (480, note_off(0, 60)),
            (0,   note_off(1, 79)),
            (0,   note_on(0, 64)),
            (0,   note_on(1, 83)),
            (480, note_off(0, 64)),
            (0,   note_off(1, 83)),
        ];
        let mut smf = build_smf(vec![track]);
        smf.header.format = Format::SingleTrack;
        assert_eq!(tokens_of(&smf), vec!["C4", "E4"]);
    }

    #[test]
    fn test_single_track_without_programs_merges_channels_by_tick() {
        let track = vec![
            (0,   note_on(0, 60)),
            (0,   note_on(1, 67)),
            (480, note_on(0, 64)),
        ];
        let mut smf = build_smf(vec![track]);
        smf.header.format = Format::SingleTrack;
        assert_eq!(tokens_of(&smf), vec!["C4", "G4", "E4"]);
    }

    #[test]
    fn test_loader_is_deterministic_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        build_smf(vec![melody(0)]).save(dir.path().join("b.mid")).unwrap();
        build_smf(vec![vec![(0, note_on(0, 77))]]).save(dir.path().join("a.mid")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not midi").unwrap();

        let loader = MidiLoader::new(dir.path());
        let first  = loader.load_all().unwrap();
        let second = loader.load_all().unwrap();
        assert_eq!(first, vec!["F5", "C4", "0.4.7", "E4"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.mid"), b"MThd nonsense").unwrap();
        let err = MidiLoader::new(dir.path()).load_all().unwrap_err();
        assert!(err.to_string().contains("broken.mid"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(MidiLoader::new("/nonexistent/midi_files").load_all().is_err());
    }
}
