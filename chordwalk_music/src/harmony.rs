// Scale and chord interval tables.
//
// These two tables are the only place interval content lives. Each scale is
// an ascending list of semitone offsets from its root ending on the octave
// (12); each chord type is a short list of offsets from the chord root.
// Both are addressed by identifier strings in configuration, so every kind
// round-trips through `name()` / `from_name()`.
//
// builder.rs turns a table entry plus a root `Pitch` into concrete notes.

use crate::error::{MelodyError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The scales a phrase can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ScaleKind {
    /// 2 2 1 2 2 2 1
    Major,
    /// 2 1 2 2 1 2 2
    NaturalMinor,
    /// 2 2 3 2 3
    MajorPentatonic,
    /// 3 2 1 1 3 2
    Blues,
    /// Every semitone.
    Chromatic,
}

impl ScaleKind {
    pub const ALL: [ScaleKind; 5] = [
        ScaleKind::Major,
        ScaleKind::NaturalMinor,
        ScaleKind::MajorPentatonic,
        ScaleKind::Blues,
        ScaleKind::Chromatic,
    ];

    /// Semitone offsets from the root, including the octave as the last degree.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ScaleKind::Major => &[0, 2, 4, 5, 7, 9, 11, 12],
            ScaleKind::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10, 12],
            ScaleKind::MajorPentatonic => &[0, 2, 4, 7, 9, 12],
            ScaleKind::Blues => &[0, 3, 5, 6, 7, 10, 12],
            ScaleKind::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        }
    }

    /// Configuration identifier.
    pub fn name(self) -> &'static str {
        match self {
            ScaleKind::Major => "major",
            ScaleKind::NaturalMinor => "natural-minor",
            ScaleKind::MajorPentatonic => "major-pentatonic",
            ScaleKind::Blues => "blues",
            ScaleKind::Chromatic => "chromatic",
        }
    }

    /// Look up a scale by identifier. The spaced display names
    /// ("natural minor", "blues scale", ...) are accepted too.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "major" => Ok(ScaleKind::Major),
            "natural-minor" | "natural minor" => Ok(ScaleKind::NaturalMinor),
            "major-pentatonic" | "major pentatonic" => Ok(ScaleKind::MajorPentatonic),
            "blues" | "blues scale" => Ok(ScaleKind::Blues),
            "chromatic" => Ok(ScaleKind::Chromatic),
            _ => Err(MelodyError::UnknownScale(name.to_string())),
        }
    }

    /// Number of degrees, counting the octave.
    pub fn degree_count(self) -> usize {
        self.intervals().len()
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ScaleKind> for &'static str {
    fn from(scale: ScaleKind) -> &'static str {
        scale.name()
    }
}

impl FromStr for ScaleKind {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self> {
        ScaleKind::from_name(s)
    }
}

/// Chord qualities available to the progression generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ChordKind {
    Maj,
    Min,
    Maj7,
    Min7,
    /// Dominant seventh, written `7`.
    Dominant7,
    Sus4,
    Sus2,
}

impl ChordKind {
    pub const ALL: [ChordKind; 7] = [
        ChordKind::Maj,
        ChordKind::Min,
        ChordKind::Maj7,
        ChordKind::Min7,
        ChordKind::Dominant7,
        ChordKind::Sus4,
        ChordKind::Sus2,
    ];

    /// Semitone offsets from the chord root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordKind::Maj => &[0, 4, 7],
            ChordKind::Min => &[0, 3, 7],
            ChordKind::Maj7 => &[0, 4, 7, 11],
            ChordKind::Min7 => &[0, 3, 7, 10],
            ChordKind::Dominant7 => &[0, 4, 7, 10],
            ChordKind::Sus4 => &[0, 5, 7],
            ChordKind::Sus2 => &[0, 2, 7],
        }
    }

    /// Configuration identifier, also the suffix used in chord labels.
    pub fn name(self) -> &'static str {
        match self {
            ChordKind::Maj => "maj",
            ChordKind::Min => "min",
            ChordKind::Maj7 => "maj7",
            ChordKind::Min7 => "min7",
            ChordKind::Dominant7 => "7",
            ChordKind::Sus4 => "sus4",
            ChordKind::Sus2 => "sus2",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        ChordKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name.trim())
            .ok_or_else(|| MelodyError::UnknownChordType(name.to_string()))
    }
}

impl fmt::Display for ChordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ChordKind> for &'static str {
    fn from(kind: ChordKind) -> &'static str {
        kind.name()
    }
}

impl FromStr for ChordKind {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self> {
        ChordKind::from_name(s)
    }
}
