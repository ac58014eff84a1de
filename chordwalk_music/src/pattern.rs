// Melodic patterns: how a chord is rendered into notes within one beat.
//
// Each pattern takes the chord tones (sorted ascending) and a start beat,
// returns the note events it plays, and always advances the cursor by
// exactly one beat. Subdivision inside that beat is the pattern's own
// business: arpeggios split it into `1 / len` slices, the short and double
// patterns into halves.
//
// Only `RandomArpeggio` draws from the RNG. Events come back ordered by
// onset so they can be appended to a track as-is.

use crate::error::{MelodyError, Result};
use crate::pitch::Pitch;
use crate::track::{Beat, NoteEvent};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Pattern {
    /// Every note together for the whole beat.
    AllNotesOn,
    /// Every note together twice, half a beat each.
    DoubleNotes,
    /// Every note together for half a beat, then silence.
    ShortNotes,
    /// Lowest to highest.
    AscendingArpeggio,
    /// Highest to lowest.
    DescendingArpeggio,
    /// Chord tones in a random order, each used once.
    RandomArpeggio,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Pattern::AllNotesOn,
        Pattern::DoubleNotes,
        Pattern::ShortNotes,
        Pattern::AscendingArpeggio,
        Pattern::DescendingArpeggio,
        Pattern::RandomArpeggio,
    ];

    /// Configuration identifier.
    pub fn name(self) -> &'static str {
        match self {
            Pattern::AllNotesOn => "all-notes-on",
            Pattern::DoubleNotes => "double-notes",
            Pattern::ShortNotes => "short-notes",
            Pattern::AscendingArpeggio => "ascending-arpeggio",
            Pattern::DescendingArpeggio => "descending-arpeggio",
            Pattern::RandomArpeggio => "random-arpeggio",
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Pattern::AllNotesOn => "All notes on",
            Pattern::DoubleNotes => "Double notes",
            Pattern::ShortNotes => "Short notes",
            Pattern::AscendingArpeggio => "Asc. arp.",
            Pattern::DescendingArpeggio => "Desc. arp.",
            Pattern::RandomArpeggio => "Rand. arp.",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.name() == name.trim())
            .ok_or_else(|| MelodyError::UnknownPattern(name.to_string()))
    }

    /// Render `notes` starting at `start`. Returns the events (by onset)
    /// and the next beat cursor, which is always `start + 1`.
    pub fn expand(
        self,
        notes: &[Pitch],
        start: Beat,
        rng: &mut impl Rng,
    ) -> (Vec<NoteEvent>, Beat) {
        let next = start + Beat::ONE;
        if notes.is_empty() {
            return (Vec::new(), next);
        }

        let half = Beat::fraction(1, 2);
        let slice = Beat::fraction(1, notes.len() as u32);

        let events = match self {
            Pattern::AllNotesOn => notes
                .iter()
                .map(|&p| NoteEvent::new(p, start, Beat::ONE))
                .collect(),
            Pattern::DoubleNotes => {
                let first = notes.iter().map(|&p| NoteEvent::new(p, start, half));
                let second = notes.iter().map(|&p| NoteEvent::new(p, start + half, half));
                first.chain(second).collect()
            }
            Pattern::ShortNotes => notes
                .iter()
                .map(|&p| NoteEvent::new(p, start, half))
                .collect(),
            Pattern::AscendingArpeggio => notes
                .iter()
                .enumerate()
                .map(|(i, &p)| NoteEvent::new(p, start + slice * i as u32, slice))
                .collect(),
            Pattern::DescendingArpeggio => notes
                .iter()
                .rev()
                .enumerate()
                .map(|(i, &p)| NoteEvent::new(p, start + slice * i as u32, slice))
                .collect(),
            Pattern::RandomArpeggio => {
                let mut remaining = notes.to_vec();
                let mut events = Vec::with_capacity(notes.len());
                // Slots are filled from the last one back to the first.
                for slot in (0..notes.len()).rev() {
                    let pick = rng.random_range(0..remaining.len());
                    let pitch = remaining.remove(pick);
                    events.push(NoteEvent::new(pitch, start + slice * slot as u32, slice));
                }
                events.reverse();
                events
            }
        };

        (events, next)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Pattern> for &'static str {
    fn from(pattern: Pattern) -> &'static str {
        pattern.name()
    }
}

impl FromStr for Pattern {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self> {
        Pattern::from_name(s)
    }
}
