//! Per-recording chord timelines.

use serde::{Deserialize, Serialize};

use crate::segment::ChordSegment;

/// Time-ordered chord segments of one recording, with leading no-chord
/// segments removed.
///
/// A timeline left with no segments is degenerate and must not reach the
/// estimator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SongTimeline {
    segments: Vec<ChordSegment>,
    stripped: usize,
}

impl SongTimeline {
    /// Assemble a timeline, stripping every leading `N` segment. Never fails.
    pub fn assemble(segments: Vec<ChordSegment>) -> Self {
        let stripped = segments.iter().take_while(|s| s.is_no_chord()).count();
        let segments = segments.into_iter().skip(stripped).collect();
        Self { segments, stripped }
    }

    pub fn segments(&self) -> &[ChordSegment] {
        &self.segments
    }

    pub fn first(&self) -> Option<&ChordSegment> {
        self.segments.first()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when nothing is left to estimate from.
    pub fn is_degenerate(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of leading no-chord segments removed by [`SongTimeline::assemble`].
    pub fn stripped_no_chord(&self) -> usize {
        self.stripped
    }
}
