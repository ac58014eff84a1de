// Absolute note pitches.
//
// A `Pitch` is a MIDI note number in 0..128 (A4 = 69 = 440 Hz). It is a
// plain `Copy` value compared by number, so sorting chord tones ascending is
// just `sort()`. Names use sharps only and a signed octave, where octave 4
// starts at C4 = 60 and note 0 is `C-1`.
//
// Used by harmony.rs/builder.rs to lay out scales and chords, and by
// pattern.rs to stamp pitches into note events.

use crate::error::{MelodyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of MIDI notes.
pub const NUM_NOTES: i32 = 128;

/// Number of semitones per octave.
pub const NOTES_PER_OCTAVE: i32 = 12;

/// Number of cents per octave.
pub const CENTS_PER_OCTAVE: f64 = 1200.0;

/// Tuning reference: A4 frequency in Hz.
pub const A4_FREQ: f64 = 440.0;

/// Tuning reference: A4 note number.
pub const A4_NOTE: i32 = 69;

/// Pitch-class names, indexed by semitone offset from C.
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// An absolute note pitch (MIDI note number 0-127).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch(u8);

impl Pitch {
    /// Wrap a note number, failing if it is outside 0..128.
    pub fn from_number(n: i32) -> Result<Self> {
        if (0..NUM_NOTES).contains(&n) {
            Ok(Pitch(n as u8))
        } else {
            Err(MelodyError::OutOfRange(n))
        }
    }

    /// Parse a name of the form `<letter>[#]<octave>`, e.g. `C4`, `f#3`, `C-1`.
    pub fn from_name(name: &str) -> Result<Self> {
        let invalid = || MelodyError::InvalidPitchName(name.to_string());

        let mut chars = name.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let rest = chars.as_str();
        let (class_name, octave_str) = match rest.strip_prefix('#') {
            Some(octave) => (format!("{letter}#"), octave),
            None => (letter.to_string(), rest),
        };

        let pc = PITCH_CLASS_NAMES
            .iter()
            .position(|&n| n == class_name)
            .ok_or_else(invalid)? as i32;

        let digits = octave_str.strip_prefix('-').unwrap_or(octave_str);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;

        let number = (octave + 1)
            .checked_mul(NOTES_PER_OCTAVE)
            .and_then(|n| n.checked_add(pc))
            .ok_or(MelodyError::OutOfRange(i32::MAX))?;
        Pitch::from_number(number)
    }

    /// The underlying note number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Pitch class (0 = C ... 11 = B).
    pub fn pitch_class(self) -> u8 {
        self.0 % NOTES_PER_OCTAVE as u8
    }

    /// Octave number; C4 = 60 starts octave 4.
    pub fn octave(self) -> i32 {
        self.0 as i32 / NOTES_PER_OCTAVE - 1
    }

    /// Note name with octave, e.g. `"D#4"`.
    pub fn name(self) -> String {
        format!(
            "{}{}",
            PITCH_CLASS_NAMES[self.pitch_class() as usize],
            self.octave()
        )
    }

    /// Frequency in Hz, detuned by `cents_offset` cents.
    ///
    /// F(n) = 440 * 2^((n - 69) / 12 + cents / 1200)
    pub fn frequency(self, cents_offset: f64) -> f64 {
        let note_exp = (self.0 as i32 - A4_NOTE) as f64 / NOTES_PER_OCTAVE as f64;
        let offset_exp = cents_offset / CENTS_PER_OCTAVE;
        A4_FREQ * 2f64.powf(note_exp + offset_exp)
    }

    /// Move by whole octaves; fails if the result leaves 0..128.
    pub fn shift_octaves(self, octaves: i32) -> Result<Self> {
        let shifted = octaves
            .checked_mul(NOTES_PER_OCTAVE)
            .and_then(|s| s.checked_add(self.0 as i32))
            .ok_or(MelodyError::OutOfRange(i32::MAX))?;
        Pitch::from_number(shifted)
    }

    /// Move up by a number of semitones (used to lay out interval tables).
    pub fn transpose(self, semitones: u8) -> Result<Self> {
        Pitch::from_number(self.0 as i32 + semitones as i32)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Pitch {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self> {
        Pitch::from_name(s)
    }
}

impl TryFrom<String> for Pitch {
    type Error = MelodyError;

    fn try_from(name: String) -> Result<Self> {
        Pitch::from_name(&name)
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> String {
        pitch.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip_all_notes() {
        for n in 0..NUM_NOTES {
            let pitch = Pitch::from_number(n).unwrap();
            assert_eq!(Pitch::from_name(&pitch.name()).unwrap(), pitch, "note {n}");
        }
    }

    #[test]
    fn test_known_names() {
        assert_eq!(Pitch::from_name("C4").unwrap().number(), 60);
        assert_eq!(Pitch::from_name("A4").unwrap().number(), 69);
        assert_eq!(Pitch::from_name("c#4").unwrap().number(), 61);
        assert_eq!(Pitch::from_name("C-1").unwrap().number(), 0);
        assert_eq!(Pitch::from_name("G9").unwrap().number(), 127);
        assert_eq!(Pitch::from_number(0).unwrap().name(), "C-1");
        assert_eq!(Pitch::from_number(63).unwrap().name(), "D#4");
    }

    #[test]
    fn test_invalid_names() {
        for bad in ["", "H4", "C", "Cb4", "C#", "4C", "C4x", "E#4", "C--1"] {
            assert!(
                matches!(Pitch::from_name(bad), Err(MelodyError::InvalidPitchName(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            Pitch::from_name("G#9"),
            Err(MelodyError::OutOfRange(128))
        ));
    }

    #[test]
    fn test_from_number_range() {
        assert!(Pitch::from_number(127).is_ok());
        assert!(matches!(Pitch::from_number(128), Err(MelodyError::OutOfRange(128))));
        assert!(matches!(Pitch::from_number(-1), Err(MelodyError::OutOfRange(-1))));
    }

    #[test]
    fn test_frequency() {
        assert_eq!(Pitch::from_name("A4").unwrap().frequency(0.0), 440.0);
        assert_eq!(Pitch::from_name("A5").unwrap().frequency(0.0), 880.0);
        assert_eq!(Pitch::from_name("A3").unwrap().frequency(0.0), 220.0);
        // One octave of detune lands on the next A.
        assert_eq!(Pitch::from_name("A4").unwrap().frequency(1200.0), 880.0);
        let c4 = Pitch::from_name("C4").unwrap().frequency(0.0);
        assert!((c4 - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_class_and_octave() {
        let fs3 = Pitch::from_name("F#3").unwrap();
        assert_eq!(fs3.pitch_class(), 6);
        assert_eq!(fs3.octave(), 3);
        assert_eq!(Pitch::from_number(0).unwrap().octave(), -1);
    }

    #[test]
    fn test_shift_octaves() {
        let c4 = Pitch::from_name("C4").unwrap();
        assert_eq!(c4.shift_octaves(1).unwrap().name(), "C5");
        assert_eq!(c4.shift_octaves(-2).unwrap().name(), "C2");
        assert!(matches!(c4.shift_octaves(6), Err(MelodyError::OutOfRange(132))));
        assert!(matches!(c4.shift_octaves(-6), Err(MelodyError::OutOfRange(-12))));
    }

    #[test]
    fn test_ordering_sorts_by_number() {
        let mut notes: Vec<Pitch> = ["G4", "C5", "E4"]
            .iter()
            .map(|n| n.parse().unwrap())
            .collect();
        notes.sort();
        let names: Vec<String> = notes.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["E4", "G4", "C5"]);
    }

    #[test]
    fn test_serde_as_name() {
        let pitch = Pitch::from_name("D#4").unwrap();
        let json = serde_json::to_string(&pitch).unwrap();
        assert_eq!(json, "\"D#4\"");
        let back: Pitch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pitch);
        assert!(serde_json::from_str::<Pitch>("\"Q9\"").is_err());
    }
}
