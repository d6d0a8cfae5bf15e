// ============================================================
// Layer 3 - Note / Chord Tokens
// ============================================================
// Every musical event extracted from a MIDI file is turned into
// one string token:
//
//   single note  → pitch name with octave     "F5", "C#4", "B-3"
//   chord        → normal-order pitch classes "0.4.7", "7.11.2"
//
// Pitch spelling uses one fixed name per pitch class
// (sharps for C# F# G#, flats for E- B-), and MIDI key 60 is C4.
//
// Reference: Rahn (1980) Basic Atonal Theory - normal order
//            Rust Book §6 (Enums)

use serde::{Deserialize, Serialize};

/// A token is the string form of a NoteEvent.
/// The corpus and the vocabulary are both built from these.
pub type Token = String;

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "E-", "E", "F", "F#", "G", "G#", "A", "B-", "B",
];

/// A musical event at one onset of one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteEvent {
    /// One key sounding on its own
    Note { key: u8 },

    /// Two or more distinct keys starting together
    Chord { keys: Vec<u8> },
}

impl NoteEvent {
    /// Build an event from the keys that start at the same tick.
    /// Returns None when there are no keys.
    pub fn from_keys(mut keys: Vec<u8>) -> Option<Self> {
        keys.sort_unstable();
        keys.dedup();
        match keys.len() {
            0 => None,
            1 => Some(NoteEvent::Note { key: keys[0] }),
            _ => Some(NoteEvent::Chord { keys }),
        }
    }

    /// The string token this event contributes to the corpus.
    pub fn token(&self) -> Token {
        match self {
            NoteEvent::Note { key } => pitch_name(*key),
            NoteEvent::Chord { keys } => {
                let pcs: Vec<u8> = keys.iter().map(|k| k % 12).collect();
                normal_order(&pcs)
                    .iter()
                    .map(|pc| pc.to_string())
                    .collect::<Vec<_>>()
                    .join(".")
            }
        }
    }
}

/// Name of a MIDI key, e.g. 60 → "C4", 63 → "E-4", 21 → "A0".
pub fn pitch_name(key: u8) -> String {
    let pc     = (key % 12) as usize;
    let octave = (key / 12) as i32 - 1;
    format!("{}{}", PITCH_CLASS_NAMES[pc], octave)
}

/// Normal order of a pitch-class set.
///
/// The distinct pitch classes are sorted and every rotation is
/// scored by the span from its first to its last element, then by
/// the span from the first element to each inner element in turn,
/// then by the first pitch class. The lowest score wins.
///
/// ```text
/// {0, 4, 7}  → [0, 4, 7]
/// {2, 7, 11} → [7, 11, 2]
/// ```
pub fn normal_order(pitch_classes: &[u8]) -> Vec<u8> {
    let mut set: Vec<u8> = pitch_classes.iter().map(|pc| pc % 12).collect();
    set.sort_unstable();
    set.dedup();

    let n = set.len();
    if n <= 1 {
        return set;
    }

    let rotations = (0..n).map(|r| (0..n).map(|i| set[(r + i) % n]).collect::<Vec<u8>>());

    rotations
        .min_by_key(|rot| {
            let span = |to: usize| (rot[to] + 12 - rot[0]) % 12;
            let mut key = Vec::with_capacity(n + 1);
            key.push(span(n - 1));
            key.extend((1..n - 1).map(span));
            key.push(rot[0]);
            key
        })
        .unwrap_or(set)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_names() {
        assert_eq!(pitch_name(60), "C4");
        assert_eq!(pitch_name(61), "C#4");
        assert_eq!(pitch_name(63), "E-4");
        assert_eq!(pitch_name(77), "F5");
        assert_eq!(pitch_name(70), "B-4");
        assert_eq!(pitch_name(21), "A0");
        assert_eq!(pitch_name(0),  "C-1");
    }

    #[test]
    fn test_major_triad_normal_order() {
        // Inversions of C major all land on the same order
        assert_eq!(normal_order(&[0, 4, 7]), vec![0, 4, 7]);
        assert_eq!(normal_order(&[4, 7, 0]), vec![0, 4, 7]);
        assert_eq!(normal_order(&[7, 0, 4]), vec![0, 4, 7]);
    }

    #[test]
    fn test_normal_order_wraps_around() {
        // G B D: the compact rotation starts on G
        assert_eq!(normal_order(&[7, 11, 2]), vec![7, 11, 2]);
    }

    #[test]
    fn test_normal_order_symmetric_set_picks_lowest_start() {
        // Augmented triad: every rotation spans 8, start on 0
        assert_eq!(normal_order(&[4, 8, 0]), vec![0, 4, 8]);
    }

    #[test]
    fn test_from_keys() {
        assert_eq!(NoteEvent::from_keys(vec![]), None);
        assert_eq!(NoteEvent::from_keys(vec![64, 64]), Some(NoteEvent::Note { key: 64 }));
        assert_eq!(
            NoteEvent::from_keys(vec![67, 60, 64]),
            Some(NoteEvent::Chord { keys: vec![60, 64, 67] })
        );
    }

    #[test]
    fn test_tokens() {
        assert_eq!(NoteEvent::Note { key: 77 }.token(), "F5");
        assert_eq!(NoteEvent::Chord { keys: vec![60, 64, 67] }.token(), "0.4.7");
        assert_eq!(NoteEvent::Chord { keys: vec![55, 59, 62] }.token(), "7.11.2");
        // Octave doublings collapse to one pitch class
        assert_eq!(NoteEvent::Chord { keys: vec![48, 60] }.token(), "0");
    }
}
