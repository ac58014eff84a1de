// Error types for melody generation.
//
// Every failure is a request rejection: bad pitch input, an identifier that
// is not in the harmony or pattern tables, an empty required set, or a
// non-positive numeric field. The generation driver validates the whole
// request before producing any output, so callers never see a partially
// filled track alongside an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MelodyError {
    #[error("invalid note name: \"{0}\"")]
    InvalidPitchName(String),
    #[error("note number out of range: {0} (expected 0..128)")]
    OutOfRange(i32),
    #[error("unknown scale: \"{0}\"")]
    UnknownScale(String),
    #[error("unknown chord type: \"{0}\"")]
    UnknownChordType(String),
    #[error("unknown melodic pattern: \"{0}\"")]
    UnknownPattern(String),
    #[error("must allow at least one chord type")]
    EmptyChordTypeSet,
    #[error("must allow at least one melodic pattern type")]
    EmptyPatternSet,
    #[error("invalid {field}: {value}")]
    InvalidNumericField { field: &'static str, value: i64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MelodyError>;
