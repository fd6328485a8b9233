use std::path::PathBuf;

use thiserror::Error;

use crate::corpus::LoadStats;

/// A `cqmax` value that names no supported chord quality.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported chord quality '{0}' (expected a Harte shorthand such as maj, min, 7, hdim7)")]
pub struct ParseQualityError(pub String);

/// A CLI/config setting value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {setting} '{value}' (expected one of: {expected})")]
pub struct ParseSettingError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Dataset discovery errors.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("dataset root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("failed to walk dataset root {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

/// Estimation errors. Raised for configuration problems before any corpus
/// work, or when the corpus holds no usable data.
#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("window size must be a positive number of seconds, got {0}")]
    InvalidWindowSize(f64),

    #[error("{0} matrix estimation is not supported")]
    Unsupported(&'static str),

    #[error(
        "no usable songs: {songs_skipped} song(s) had no resolvable first chord; \
         load stats: {load}"
    )]
    NoUsableSongs { songs_skipped: usize, load: LoadStats },

    #[error(
        "no transition events accumulated ({events_skipped} event(s) skipped); \
         load stats: {load}"
    )]
    NoTransitionEvents { events_skipped: u64, load: LoadStats },

    #[error("cannot merge transition counts over {found} states into counts over {expected}")]
    StateCountMismatch { expected: usize, found: usize },
}
