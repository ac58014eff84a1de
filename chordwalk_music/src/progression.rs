// Chord progression generation: a weighted random walk over scale degrees.
//
// The walk keeps a beat cursor and emits one chord step per iteration until
// the step it just emitted was the final one. At the top of each iteration
// the cursor decides whether this step is final (`cursor > num_beats - 2`,
// i.e. less than one full beat of room remains). A final step with
// `end_on_tonic` set is forced to the tonic major chord played with
// `AllNotesOn`. Every other step rolls a six- or seven-faced die:
//
//   face 0      any degree, any allowed chord type
//   face 1      I   (tonic, major substitute)
//   faces 2-3   IV  (subdominant, major substitute)
//   faces 4-5   V   (dominant, major substitute)
//   face 6      vi  (relative minor, minor substitute; only when the scale
//               has more than five degrees)
//
// The "major substitute" is `maj` if allowed, else `maj7`, else whichever
// chord type was listed first; the minor substitute works the same way over
// `min`/`min7`. The first-listed fallback is not a harmonic choice, just a
// deterministic one.
//
// Each step may raise its chord root by an octave (50% when root inversion
// is on), sorts the chord tones ascending, and hands them to a pattern. The
// last pattern can carry the phrase slightly past `num_beats`; that bounded
// overshoot is expected.

use crate::builder::{build_chord, build_scale};
use crate::error::{MelodyError, Result};
use crate::harmony::{ChordKind, ScaleKind};
use crate::pattern::Pattern;
use crate::pitch::Pitch;
use crate::track::{Beat, NoteEvent};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Scale degree of the tonic (I).
pub const TONIC: usize = 0;
/// Scale degree of the subdominant (IV).
pub const SUBDOMINANT: usize = 3;
/// Scale degree of the dominant (V).
pub const DOMINANT: usize = 4;
/// Scale degree of the relative minor (vi).
pub const RELATIVE_MINOR: usize = 5;

/// Inputs to the progression walk.
#[derive(Debug, Clone)]
pub struct ProgressionConfig {
    pub root: Pitch,
    pub scale: ScaleKind,
    /// Allowed chord types, in configured order.
    pub chord_kinds: Vec<ChordKind>,
    /// Allowed patterns, in configured order.
    pub patterns: Vec<Pattern>,
    /// Target length in beats.
    pub num_beats: u32,
    pub root_inversion: bool,
    pub end_on_tonic: bool,
}

/// Outcome of the per-step die roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmonicMove {
    /// Uniformly random degree and chord type.
    Random,
    Tonic,
    Subdominant,
    Dominant,
    RelativeMinor,
}

impl HarmonicMove {
    /// Roll the die. Scales of five degrees or fewer have no usable vi, so
    /// the seventh face is left off.
    pub fn roll(rng: &mut impl Rng, scale_len: usize) -> Self {
        let faces = if scale_len > 5 { 7 } else { 6 };
        match rng.random_range(0..faces) {
            0 => HarmonicMove::Random,
            1 => HarmonicMove::Tonic,
            2 | 3 => HarmonicMove::Subdominant,
            4 | 5 => HarmonicMove::Dominant,
            _ => HarmonicMove::RelativeMinor,
        }
    }
}

/// One chord of the generated progression and how it was rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordStep {
    /// Index into the scale.
    pub degree: usize,
    pub kind: ChordKind,
    /// Chord root taken from the scale.
    pub root: Pitch,
    /// Chord tones as played, sorted ascending.
    pub notes: Vec<Pitch>,
    /// Whether the root was raised an octave.
    pub inverted: bool,
    pub pattern: Pattern,
    pub start: Beat,
    /// The forced closing tonic.
    pub cadence: bool,
}

impl fmt::Display for ChordStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.kind)
    }
}

/// Result of one iteration of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Keep going from this cursor.
    Continue(Beat),
    /// The final step was emitted.
    Done,
}

/// The complete output of a walk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Progression {
    pub steps: Vec<ChordStep>,
    /// All pattern output, in step order.
    pub events: Vec<NoteEvent>,
    pub end_beat: Beat,
}

impl Progression {
    /// Space-separated chord names, e.g. `"C4maj F4maj G4maj C4maj"`.
    pub fn chord_label(&self) -> String {
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The progression state machine for one request.
#[derive(Debug, Clone)]
pub struct ProgressionGenerator {
    scale: Vec<Pitch>,
    chord_kinds: Vec<ChordKind>,
    patterns: Vec<Pattern>,
    num_beats: u32,
    root_inversion: bool,
    end_on_tonic: bool,
    major: ChordKind,
    minor: ChordKind,
}

impl ProgressionGenerator {
    pub fn new(config: ProgressionConfig) -> Result<Self> {
        if config.chord_kinds.is_empty() {
            return Err(MelodyError::EmptyChordTypeSet);
        }
        if config.patterns.is_empty() {
            return Err(MelodyError::EmptyPatternSet);
        }
        if config.num_beats == 0 {
            return Err(MelodyError::InvalidNumericField {
                field: "number of beats",
                value: 0,
            });
        }

        let scale = build_scale(config.root, config.scale)?;
        let major = substitute(&config.chord_kinds, [ChordKind::Maj, ChordKind::Maj7]);
        let minor = substitute(&config.chord_kinds, [ChordKind::Min, ChordKind::Min7]);

        Ok(ProgressionGenerator {
            scale,
            chord_kinds: config.chord_kinds,
            patterns: config.patterns,
            num_beats: config.num_beats,
            root_inversion: config.root_inversion,
            end_on_tonic: config.end_on_tonic,
            major,
            minor,
        })
    }

    /// Chord type used for I, IV and V.
    pub fn major_substitute(&self) -> ChordKind {
        self.major
    }

    /// Chord type used for vi.
    pub fn minor_substitute(&self) -> ChordKind {
        self.minor
    }

    /// True when fewer than one full beat of room remains before the end.
    pub fn is_final_step(&self, cursor: Beat) -> bool {
        let last = (self.num_beats as i64 - 2) * Beat::TICKS_PER_BEAT as i64;
        cursor.ticks() as i64 > last
    }

    /// Pick the degree and chord type for a step.
    fn choose_chord(&self, cadence: bool, rng: &mut impl Rng) -> (usize, ChordKind) {
        if cadence {
            return (TONIC, self.major);
        }
        match HarmonicMove::roll(rng, self.scale.len()) {
            HarmonicMove::Random => self.random_chord(rng),
            HarmonicMove::Tonic => (TONIC, self.major),
            HarmonicMove::Subdominant => (SUBDOMINANT, self.major),
            HarmonicMove::Dominant => (DOMINANT, self.major),
            HarmonicMove::RelativeMinor => (RELATIVE_MINOR, self.minor),
        }
    }

    /// Any degree of the scale with any allowed chord type, both uniform.
    fn random_chord(&self, rng: &mut impl Rng) -> (usize, ChordKind) {
        let degree = rng.random_range(0..self.scale.len());
        let kind = self.chord_kinds[rng.random_range(0..self.chord_kinds.len())];
        (degree, kind)
    }

    /// Emit one chord step at `cursor` into `out`.
    pub fn step(&self, cursor: Beat, rng: &mut impl Rng, out: &mut Progression) -> Result<Walk> {
        let is_final = self.is_final_step(cursor);
        let cadence = is_final && self.end_on_tonic;

        let (degree, kind) = self.choose_chord(cadence, rng);
        let root = self.scale[degree];
        let mut notes = build_chord(root, kind)?;

        let inverted = self.root_inversion && rng.random_bool(0.5);
        if inverted {
            notes[0] = notes[0].shift_octaves(1)?;
        }
        notes.sort();

        let pattern = if cadence {
            Pattern::AllNotesOn
        } else {
            self.patterns[rng.random_range(0..self.patterns.len())]
        };

        let (events, next) = pattern.expand(&notes, cursor, rng);
        let step = ChordStep {
            degree,
            kind,
            root,
            notes,
            inverted,
            pattern,
            start: cursor,
            cadence,
        };
        tracing::trace!(
            beat = %cursor,
            chord = %step,
            pattern = pattern.name(),
            inverted,
            "chord step"
        );

        out.events.extend(events);
        out.steps.push(step);
        out.end_beat = next;

        Ok(if is_final {
            Walk::Done
        } else {
            Walk::Continue(next)
        })
    }

    /// Walk from beat zero until the final step has been emitted.
    pub fn run(&self, rng: &mut impl Rng) -> Result<Progression> {
        let mut progression = Progression::default();
        let mut cursor = Beat::ZERO;
        loop {
            match self.step(cursor, rng, &mut progression)? {
                Walk::Continue(next) => cursor = next,
                Walk::Done => return Ok(progression),
            }
        }
    }
}

/// First preferred type that is allowed, else the first allowed type.
fn substitute(allowed: &[ChordKind], preferred: [ChordKind; 2]) -> ChordKind {
    preferred
        .into_iter()
        .find(|kind| allowed.contains(kind))
        .unwrap_or(allowed[0])
}
