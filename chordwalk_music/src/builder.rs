// Scale and chord construction from a root pitch.
//
// Adds each table offset to the root's note number. The results come out in
// table order, which is ascending, and every note must stay inside the MIDI
// range or the whole build fails.

use crate::error::Result;
use crate::harmony::{ChordKind, ScaleKind};
use crate::pitch::Pitch;

/// Lay out an interval table above `root`.
fn stack(root: Pitch, intervals: &[u8]) -> Result<Vec<Pitch>> {
    intervals.iter().map(|&iv| root.transpose(iv)).collect()
}

/// The notes of `scale` starting at `root`, octave included.
pub fn build_scale(root: Pitch, scale: ScaleKind) -> Result<Vec<Pitch>> {
    stack(root, scale.intervals())
}

/// The notes of a `kind` chord rooted at `root`, in root position.
pub fn build_chord(root: Pitch, kind: ChordKind) -> Result<Vec<Pitch>> {
    stack(root, kind.intervals())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MelodyError;

    fn names(notes: &[Pitch]) -> Vec<String> {
        notes.iter().map(|p| p.name()).collect()
    }

    fn c4() -> Pitch {
        Pitch::from_name("C4").unwrap()
    }

    #[test]
    fn test_c_major_scale() {
        let scale = build_scale(c4(), ScaleKind::Major).unwrap();
        assert_eq!(
            names(&scale),
            ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]
        );
    }

    #[test]
    fn test_a_natural_minor_scale() {
        let a3 = Pitch::from_name("A3").unwrap();
        let scale = build_scale(a3, ScaleKind::NaturalMinor).unwrap();
        assert_eq!(
            names(&scale),
            ["A3", "B3", "C4", "D4", "E4", "F4", "G4", "A4"]
        );
    }

    #[test]
    fn test_chords() {
        assert_eq!(names(&build_chord(c4(), ChordKind::Maj).unwrap()), ["C4", "E4", "G4"]);
        assert_eq!(
            names(&build_chord(c4(), ChordKind::Min7).unwrap()),
            ["C4", "D#4", "G4", "A#4"]
        );
        assert_eq!(
            names(&build_chord(c4(), ChordKind::Dominant7).unwrap()),
            ["C4", "E4", "G4", "A#4"]
        );
    }

    #[test]
    fn test_output_is_ascending() {
        for scale in ScaleKind::ALL {
            let notes = build_scale(c4(), scale).unwrap();
            assert_eq!(notes.len(), scale.degree_count());
            assert!(notes.windows(2).all(|w| w[0] < w[1]), "{scale}");
        }
        for kind in ChordKind::ALL {
            let notes = build_chord(c4(), kind).unwrap();
            assert!(notes.windows(2).all(|w| w[0] < w[1]), "{kind}");
        }
    }

    #[test]
    fn test_out_of_range_root() {
        let g9 = Pitch::from_name("G9").unwrap();
        assert!(matches!(
            build_chord(g9, ChordKind::Maj),
            Err(MelodyError::OutOfRange(131))
        ));
        assert!(matches!(
            build_scale(g9, ScaleKind::Chromatic),
            Err(MelodyError::OutOfRange(128))
        ));
    }
}
