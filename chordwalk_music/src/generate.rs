// Generation driver: request validation and the single public entry point.
//
// A `GenerationRequest` is the loosely typed configuration handed over by a
// form, a JSON file, or the CLI. `validate()` turns it into a typed
// `GenerationPlan`, rejecting the first violated constraint in form order
// (root, scale, duration, tempo, time signature, chord types, patterns).
// Rendering then runs the whole progression in memory and only touches the
// sink once it has succeeded, so a failed request never leaves a half
// written track behind.

use crate::error::{MelodyError, Result};
use crate::harmony::{ChordKind, ScaleKind};
use crate::pattern::Pattern;
use crate::pitch::Pitch;
use crate::progression::{ChordStep, Progression, ProgressionConfig, ProgressionGenerator};
use crate::track::{Beat, Meter, Track, TrackSink};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest phrase accepted, in beats.
pub const MAX_BEATS: i64 = 1 << 16;

const _: () = assert!(MAX_BEATS < Beat::MAX_WHOLE_BEATS as i64);

/// User-facing generation settings, as read from a form or config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Scale root note name, e.g. `"C4"`.
    pub root: String,
    /// Scale identifier, e.g. `"major"`.
    pub scale: String,
    /// Duration in bars.
    pub num_bars: i64,
    /// Time signature numerator.
    pub beats_per_bar: i64,
    /// Tempo.
    pub beats_per_minute: i64,
    /// Time signature denominator.
    pub note_value: i64,
    /// Allowed chord type identifiers. Order matters for substitute fallback.
    pub chord_types: Vec<String>,
    /// Allowed pattern identifiers.
    pub patterns: Vec<String>,
    /// Randomly raise chord roots an octave.
    pub root_inversion: bool,
    /// Force the last chord to the tonic.
    pub end_on_tonic: bool,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            root: "C4".to_string(),
            scale: ScaleKind::Major.name().to_string(),
            num_bars: 4,
            beats_per_bar: 4,
            beats_per_minute: 120,
            note_value: 4,
            chord_types: vec![ChordKind::Maj.name().into(), ChordKind::Min.name().into()],
            patterns: Pattern::ALL.iter().map(|p| p.name().to_string()).collect(),
            root_inversion: false,
            end_on_tonic: true,
        }
    }
}

impl GenerationRequest {
    /// Load a request from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let request: GenerationRequest = serde_json::from_str(&data)?;
        Ok(request)
    }

    /// Check every field and resolve identifiers, failing on the first problem.
    pub fn validate(&self) -> Result<GenerationPlan> {
        let root = Pitch::from_name(&self.root)?;
        let scale = ScaleKind::from_name(&self.scale)?;

        let num_bars = positive("duration in bars", self.num_bars)?;
        let beats_per_minute = positive("tempo", self.beats_per_minute)?;
        let beats_per_bar = positive("time signature numerator", self.beats_per_bar)?;
        let note_value = positive("time signature denominator", self.note_value)?;

        let num_beats = self.num_bars.saturating_mul(self.beats_per_bar);
        if num_beats > MAX_BEATS {
            return Err(MelodyError::InvalidNumericField {
                field: "number of beats",
                value: num_beats,
            });
        }

        if self.chord_types.is_empty() {
            return Err(MelodyError::EmptyChordTypeSet);
        }
        let chord_kinds = parse_set(&self.chord_types, ChordKind::from_name)?;

        if self.patterns.is_empty() {
            return Err(MelodyError::EmptyPatternSet);
        }
        let patterns = parse_set(&self.patterns, Pattern::from_name)?;

        Ok(GenerationPlan {
            root,
            scale,
            num_bars,
            meter: Meter {
                beats_per_minute,
                beats_per_bar,
                note_value,
            },
            chord_kinds,
            patterns,
            root_inversion: self.root_inversion,
            end_on_tonic: self.end_on_tonic,
        })
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(MelodyError::InvalidNumericField { field, value }),
    }
}

/// Parse identifiers in order, dropping repeats.
fn parse_set<T: PartialEq>(names: &[String], parse: impl Fn(&str) -> Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let item = parse(name)?;
        if !out.contains(&item) {
            out.push(item);
        }
    }
    Ok(out)
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub root: Pitch,
    pub scale: ScaleKind,
    pub num_bars: u32,
    pub meter: Meter,
    pub chord_kinds: Vec<ChordKind>,
    pub patterns: Vec<Pattern>,
    pub root_inversion: bool,
    pub end_on_tonic: bool,
}

impl GenerationPlan {
    pub fn num_beats(&self) -> u32 {
        self.num_bars * self.meter.beats_per_bar
    }

    pub fn progression_config(&self) -> ProgressionConfig {
        ProgressionConfig {
            root: self.root,
            scale: self.scale,
            chord_kinds: self.chord_kinds.clone(),
            patterns: self.patterns.clone(),
            num_beats: self.num_beats(),
            root_inversion: self.root_inversion,
            end_on_tonic: self.end_on_tonic,
        }
    }

    /// Run the progression and, on success, replace the sink's contents
    /// with the generated notes.
    pub fn render(&self, rng: &mut impl Rng, sink: &mut impl TrackSink) -> Result<Progression> {
        tracing::debug!(
            num_beats = self.num_beats(),
            scale = %self.scale,
            root = %self.root,
            "generating phrase"
        );

        let generator = ProgressionGenerator::new(self.progression_config())?;
        let progression = generator.run(rng)?;

        sink.clear();
        for &event in &progression.events {
            sink.append(event);
        }

        tracing::debug!(
            chords = %progression.chord_label(),
            end = %progression.end_beat,
            "phrase complete"
        );
        Ok(progression)
    }
}

/// A generated phrase: the notes, the chord names, and the chords behind them.
#[derive(Debug, Clone, Serialize)]
pub struct Melody {
    pub track: Track,
    pub chord_label: String,
    pub steps: Vec<ChordStep>,
}

/// Validate `request` and write the phrase into `sink`.
pub fn generate_into(
    request: &GenerationRequest,
    rng: &mut impl Rng,
    sink: &mut impl TrackSink,
) -> Result<Progression> {
    request.validate()?.render(rng, sink)
}

/// Validate `request` and generate a phrase on a fresh track carrying the
/// request's tempo and time signature.
pub fn generate(request: &GenerationRequest, rng: &mut impl Rng) -> Result<Melody> {
    let plan = request.validate()?;
    let mut track = Track::new(plan.meter);
    let progression = plan.render(rng, &mut track)?;
    Ok(Melody {
        track,
        chord_label: progression.chord_label(),
        steps: progression.steps,
    })
}
