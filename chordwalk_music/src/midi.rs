// MIDI output from melody tracks.
//
// Converts a Track into a Standard MIDI File (SMF) for playback. Output is
// SMF Format 1: track 0 carries tempo and time signature, track 1 the notes.
// One beat maps to one MIDI quarter note, and the file's resolution equals
// `Beat::TICKS_PER_BEAT` so every subdivided onset lands on an exact tick.
//
// Uses the `midly` crate for MIDI writing.

use crate::error::Result;
use crate::track::{Beat, Track};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// MIDI ticks per quarter note (one beat).
const TICKS_PER_QUARTER: u16 = Beat::TICKS_PER_BEAT as u16;

const CHANNEL: u8 = 0;

/// Acoustic grand piano.
const PROGRAM: u8 = 0;

const VELOCITY: u8 = 90;

/// Convert a Track to MIDI and write it to a file.
pub fn write_midi(track: &Track, path: &Path) -> Result<()> {
    std::fs::write(path, midi_bytes(track)?)?;
    Ok(())
}

/// Encode a Track as SMF bytes.
pub fn midi_bytes(track: &Track) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    track_to_smf(track).write_std(&mut buf)?;
    Ok(buf)
}

/// A note boundary on the absolute tick timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Boundary {
    tick: u32,
    /// Note-offs (false) sort before note-ons (true) at the same tick, so a
    /// repeated pitch is released before it is struck again.
    on: bool,
    key: u8,
}

fn track_to_smf(track: &Track) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo and time signature
    let mut meta: Vec<TrackEvent<'static>> = Vec::new();
    let micros_per_beat = (60_000_000 / track.meter.beats_per_minute.max(1)).min(0xFF_FFFF);
    meta.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_beat))),
    });
    // MIDI stores the denominator as a power of two; other values are skipped.
    let note_value = track.meter.note_value;
    if note_value.is_power_of_two() && track.meter.beats_per_bar <= u8::MAX as u32 {
        meta.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
                track.meter.beats_per_bar as u8,
                note_value.trailing_zeros() as u8,
                24,
                8,
            )),
        });
    }
    meta.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(meta);

    // Track 1: the melody
    let channel = u4::new(CHANNEL);
    let mut notes: Vec<TrackEvent<'static>> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Melody")),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PROGRAM),
                },
            },
        },
    ];

    let mut boundaries: Vec<Boundary> = track
        .events
        .iter()
        .flat_map(|e| {
            let key = e.pitch.number();
            [
                Boundary {
                    tick: e.start.ticks(),
                    on: true,
                    key,
                },
                Boundary {
                    tick: e.end().ticks(),
                    on: false,
                    key,
                },
            ]
        })
        .collect();
    boundaries.sort();

    let mut last_tick = 0;
    for b in boundaries {
        let message = if b.on {
            MidiMessage::NoteOn {
                key: u7::new(b.key),
                vel: u7::new(VELOCITY),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(b.key),
                vel: u7::new(0),
            }
        };
        notes.push(TrackEvent {
            delta: u28::new(b.tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = b.tick;
    }

    notes.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(notes);

    smf
}
