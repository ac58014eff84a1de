// Chordwalk melody generator
//
// Produces a short randomized melodic phrase from a scale root, a scale, a
// length in bars, and sets of allowed chord types and rendering patterns.
// The phrase is a chord progression walked over scale degrees (weighted
// towards I, IV, V and vi) with each chord rendered into timed notes by a
// rhythmic pattern, plus a chord-name label such as "C4maj F4maj G4maj C4maj".
//
// Architecture:
// - pitch.rs: MIDI note numbers with name/frequency conversions
// - harmony.rs: Scale and chord interval tables (the only interval source)
// - builder.rs: Scale/chord note lists from a root and a table entry
// - track.rs: Exact beat positions, note events, and the track sink
// - pattern.rs: Closed set of chord rendering patterns (block, arpeggio, ...)
// - progression.rs: Weighted random walk over degrees with final cadence
// - generate.rs: Request validation/config and the generation entry point
// - midi.rs: MIDI file output from generated tracks
// - error.rs: Request rejection errors
//
// The generator is deterministic given a seeded RNG, supporting reproducible
// output.

pub mod builder;
pub mod error;
pub mod generate;
pub mod harmony;
pub mod midi;
pub mod pattern;
pub mod pitch;
pub mod progression;
pub mod track;

pub use error::{MelodyError, Result};
pub use generate::{GenerationRequest, Melody, generate, generate_into};
