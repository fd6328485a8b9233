//! Chord annotation ingestion and HMM parameter estimation.
//!
//! Turns a corpus of time-aligned chord annotations (`start end label` lines,
//! one file per recording) into the initial-state distribution and the
//! windowed transition matrix of a chord-recognition HMM.
//!
//! # Example
//!
//! ```
//! use chord_hmm::{ChordQuality, ChordVocabulary, CorpusLoader, HmmEstimator, LabFormat, UnknownPolicy};
//!
//! let loader = CorpusLoader::new(LabFormat);
//! let corpus = loader.load_str("song.lab", "0 1 N\n1 3 C:maj\n3 4 Amin\n");
//!
//! let vocab = ChordVocabulary::up_to(ChordQuality::Minor, UnknownPolicy::Skip);
//! let estimator = HmmEstimator::new(&vocab, 0.5).unwrap();
//!
//! let transitions = estimator.transition(&corpus).unwrap();
//! assert!((transitions.matrix.sum() - 1.0).abs() < 1e-9);
//! ```

pub mod chord;
pub mod corpus;
pub mod error;
pub mod estimator;
pub mod feedback;
mod harte;
pub mod label;
pub mod segment;
pub mod song;
pub mod vocab;

pub use chord::{decompose, Chord, ChordIdentity, ChordQuality, IntervalSet, NO_CHORD, UNKNOWN_CHORD};
pub use corpus::{discover, Corpus, CorpusLoader, LoadStats, Song};
pub use error::{CorpusError, EstimationError, ParseQualityError, ParseSettingError};
pub use estimator::{
    window_count, Estimate, EstimateReport, HmmEstimator, InitialDistribution, MatrixKind,
    Normalization, TrainedMatrix, TransitionCounts, TransitionMatrix,
};
pub use feedback::{Feedback, FeedbackLevel, ParseResult};
pub use label::normalize;
pub use segment::{AnnotationFormat, ChordSegment, LabFormat};
pub use song::SongTimeline;
pub use vocab::{ChordId, ChordVocabulary, UnknownPolicy};
