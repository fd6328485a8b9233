//! Chord vocabulary: canonical labels to dense HMM state ids.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chord::{decompose, note_name, ChordIdentity, ChordQuality, UNKNOWN_CHORD};
use crate::error::ParseSettingError;

/// Result of resolving a label against the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordId {
    /// Dense id in `[0, N)`
    Chord(usize),
    /// No-chord, unparsable, or a quality outside the configured set
    Unknown,
}

/// What the estimator does with labels that resolve to [`ChordId::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Excluded from every count; reported as skipped events
    #[default]
    Skip,
    /// Counted as one extra state with id `N`
    OwnState,
}

impl FromStr for UnknownPolicy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(UnknownPolicy::Skip),
            "state" | "own_state" => Ok(UnknownPolicy::OwnState),
            _ => Err(ParseSettingError {
                setting: "unknown-chord policy",
                value: s.to_string(),
                expected: "skip, state",
            }),
        }
    }
}

/// Mapping from canonical chord labels to HMM states for one training run.
///
/// Ids are `root * |qualities| + quality_index`, so all qualities of one root
/// are adjacent. Bass notes do not change the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordVocabulary {
    qualities: Vec<ChordQuality>,
    unknown: UnknownPolicy,
}

impl ChordVocabulary {
    /// Vocabulary of every quality up to and including `max_quality`.
    pub fn up_to(max_quality: ChordQuality, unknown: UnknownPolicy) -> Self {
        Self {
            qualities: max_quality.up_to().to_vec(),
            unknown,
        }
    }

    pub fn qualities(&self) -> &[ChordQuality] {
        &self.qualities
    }

    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.unknown
    }

    /// Number of real chord classes, `N`.
    pub fn chord_count(&self) -> usize {
        12 * self.qualities.len()
    }

    /// Rows in the trained matrices: `N`, or `N + 1` with an unknown state.
    pub fn state_count(&self) -> usize {
        match self.unknown {
            UnknownPolicy::Skip => self.chord_count(),
            UnknownPolicy::OwnState => self.chord_count() + 1,
        }
    }

    /// Resolve a canonical label. Never fails.
    pub fn resolve(&self, label: &str) -> ChordId {
        let chord = match decompose(label) {
            ChordIdentity::Chord(chord) => chord,
            ChordIdentity::NoChord | ChordIdentity::Unknown => return ChordId::Unknown,
        };

        self.qualities
            .iter()
            .position(|q| q.intervals() == chord.intervals)
            .map(|qi| ChordId::Chord(chord.root as usize * self.qualities.len() + qi))
            .unwrap_or(ChordId::Unknown)
    }

    /// Matrix row for a resolved id, or `None` when the policy skips it.
    pub fn state_of(&self, id: ChordId) -> Option<usize> {
        match (id, self.unknown) {
            (ChordId::Chord(i), _) => Some(i),
            (ChordId::Unknown, UnknownPolicy::OwnState) => Some(self.chord_count()),
            (ChordId::Unknown, UnknownPolicy::Skip) => None,
        }
    }

    /// `resolve` followed by `state_of`.
    pub fn state(&self, label: &str) -> Option<usize> {
        self.state_of(self.resolve(label))
    }

    /// Canonical label of a matrix row (`C#:min`, or `X` for the unknown state).
    pub fn state_label(&self, state: usize) -> Option<String> {
        let q = self.qualities.len();
        if state < self.chord_count() {
            let root = (state / q) as u8;
            let quality = self.qualities[state % q];
            Some(format!("{}:{}", note_name(root, false), quality))
        } else if state == self.chord_count() && self.unknown == UnknownPolicy::OwnState {
            Some(UNKNOWN_CHORD.to_string())
        } else {
            None
        }
    }

    /// Labels of every matrix row in order.
    pub fn state_labels(&self) -> Vec<String> {
        (0..self.state_count())
            .filter_map(|s| self.state_label(s))
            .collect()
    }
}
