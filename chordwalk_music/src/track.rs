// Timed note events and the track they are written to.
//
// Positions are measured in beats. Patterns split a beat into halves, thirds
// or quarters, so `Beat` stores an integer tick count at a fixed resolution
// divisible by every subdivision from 1 to 8. Arithmetic is exact and
// ordering is plain integer ordering. Ticks are a `u32`, so positions past
// `Beat::MAX_WHOLE_BEATS` overflow; the generation driver caps phrase length
// well below that.
//
// The generation driver writes into any `TrackSink`; `Track` is the
// in-memory sink that also carries tempo and time signature for midi.rs.

use crate::pitch::Pitch;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

/// An exact position or length in beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(into = "f64")]
pub struct Beat(u32);

impl Beat {
    /// Ticks per beat: lcm(1..=8).
    pub const TICKS_PER_BEAT: u32 = 840;

    pub const ZERO: Beat = Beat(0);
    pub const ONE: Beat = Beat(Self::TICKS_PER_BEAT);

    /// Largest whole beat count that fits in the tick counter.
    pub const MAX_WHOLE_BEATS: u32 = u32::MAX / Self::TICKS_PER_BEAT;

    /// A whole number of beats, at most `MAX_WHOLE_BEATS`.
    pub const fn whole(beats: u32) -> Self {
        debug_assert!(beats <= Self::MAX_WHOLE_BEATS);
        Beat(beats * Self::TICKS_PER_BEAT)
    }

    /// `num / den` beats. `den` must divide 840 (any of 1..=8); other
    /// denominators would round down to the nearest tick.
    pub fn fraction(num: u32, den: u32) -> Self {
        debug_assert!(
            den > 0 && Self::TICKS_PER_BEAT % den == 0,
            "inexact beat fraction {num}/{den}"
        );
        Beat(Self::TICKS_PER_BEAT * num / den.max(1))
    }

    pub fn ticks(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::TICKS_PER_BEAT as f64
    }
}

impl Add for Beat {
    type Output = Beat;

    fn add(self, rhs: Beat) -> Beat {
        Beat(self.0 + rhs.0)
    }
}

impl AddAssign for Beat {
    fn add_assign(&mut self, rhs: Beat) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Beat {
    type Output = Beat;

    fn mul(self, rhs: u32) -> Beat {
        Beat(self.0 * rhs)
    }
}

impl From<Beat> for f64 {
    fn from(beat: Beat) -> f64 {
        beat.as_f64()
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % Self::TICKS_PER_BEAT == 0 {
            write!(f, "{}", self.0 / Self::TICKS_PER_BEAT)
        } else {
            write!(f, "{:.3}", self.as_f64())
        }
    }
}

/// One note to be played: a pitch, when it starts, and how long it lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub start: Beat,
    pub duration: Beat,
}

impl NoteEvent {
    pub fn new(pitch: Pitch, start: Beat, duration: Beat) -> Self {
        NoteEvent {
            pitch,
            start,
            duration,
        }
    }

    /// The beat at which the note stops sounding.
    pub fn end(&self) -> Beat {
        self.start + self.duration
    }
}

/// Tempo and time signature of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meter {
    pub beats_per_minute: u32,
    /// Time signature numerator.
    pub beats_per_bar: u32,
    /// Time signature denominator (4 = quarter-note beat).
    pub note_value: u32,
}

impl Default for Meter {
    fn default() -> Self {
        Meter {
            beats_per_minute: 120,
            beats_per_bar: 4,
            note_value: 4,
        }
    }
}

/// Destination for generated notes.
///
/// The driver calls `clear` once per successful request, then `append`s
/// events in non-decreasing start order.
pub trait TrackSink {
    fn clear(&mut self);
    fn append(&mut self, event: NoteEvent);
}

impl TrackSink for Vec<NoteEvent> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn append(&mut self, event: NoteEvent) {
        self.push(event);
    }
}

/// An in-memory melody track.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Track {
    pub meter: Meter,
    pub events: Vec<NoteEvent>,
}

impl Track {
    pub fn new(meter: Meter) -> Self {
        Track {
            meter,
            events: Vec::new(),
        }
    }

    /// End time of the last note to stop sounding (zero when empty).
    pub fn end_beat(&self) -> Beat {
        self.events
            .iter()
            .map(NoteEvent::end)
            .max()
            .unwrap_or(Beat::ZERO)
    }

    /// Length of the track in seconds at its tempo.
    pub fn duration_seconds(&self) -> f64 {
        self.end_beat().as_f64() * 60.0 / self.meter.beats_per_minute.max(1) as f64
    }
}

impl TrackSink for Track {
    fn clear(&mut self) {
        self.events.clear();
    }

    fn append(&mut self, event: NoteEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(name: &str) -> Pitch {
        Pitch::from_name(name).unwrap()
    }

    #[test]
    fn test_beat_fractions_are_exact() {
        let third = Beat::fraction(1, 3);
        assert_eq!(third * 3, Beat::ONE);
        assert_eq!(Beat::fraction(1, 2) + Beat::fraction(1, 2), Beat::ONE);
        assert_eq!(Beat::fraction(1, 4) * 4, Beat::ONE);
        assert_eq!(Beat::whole(2) + third, Beat::fraction(7, 3));
        assert!((Beat::fraction(7, 3).as_f64() - 2.3333).abs() < 1e-3);
    }

    #[test]
    fn test_every_pattern_subdivision_is_exact() {
        for den in 1..=8 {
            assert_eq!(Beat::fraction(1, den) * den, Beat::ONE, "1/{den}");
        }
        assert_eq!(Beat::whole(Beat::MAX_WHOLE_BEATS).ticks() / 840, Beat::MAX_WHOLE_BEATS);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "inexact beat fraction")]
    fn test_inexact_fraction_is_rejected() {
        let _ = Beat::fraction(1, 9);
    }

    #[test]
    fn test_beat_display() {
        assert_eq!(Beat::whole(3).to_string(), "3");
        assert_eq!(Beat::fraction(5, 2).to_string(), "2.500");
    }

    #[test]
    fn test_track_sink() {
        let mut track = Track::new(Meter::default());
        assert_eq!(track.end_beat(), Beat::ZERO);

        track.append(NoteEvent::new(pitch("C4"), Beat::ZERO, Beat::ONE));
        track.append(NoteEvent::new(pitch("E4"), Beat::ONE, Beat::fraction(1, 2)));
        assert_eq!(track.events.len(), 2);
        assert_eq!(track.end_beat(), Beat::fraction(3, 2));
        // 1.5 beats at 120 BPM
        assert!((track.duration_seconds() - 0.75).abs() < 1e-9);

        TrackSink::clear(&mut track);
        assert!(track.events.is_empty());
    }

    #[test]
    fn test_event_serializes_beats_as_numbers() {
        let event = NoteEvent::new(pitch("A4"), Beat::fraction(1, 2), Beat::ONE);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"pitch":"A4","start":0.5,"duration":1.0}"#);
    }
}
