//! Chord identity: Harte labels decomposed into root, bass and interval set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use winnow::Parser;

use crate::error::ParseQualityError;
use crate::harte;

/// Label of the "no chord" sentinel.
pub const NO_CHORD: &str = "N";
/// Label of the "unknown chord" sentinel.
pub const UNKNOWN_CHORD: &str = "X";

/// Set of semitone offsets from the root, as a bitmask over 12 pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntervalSet(u16);

impl IntervalSet {
    pub const EMPTY: IntervalSet = IntervalSet(0);

    pub const fn from_semitones(semitones: &[u8]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < semitones.len() {
            mask |= 1 << (semitones[i] % 12);
            i += 1;
        }
        IntervalSet(mask)
    }

    pub fn contains(self, semitone: u8) -> bool {
        self.0 & (1 << (semitone % 12)) != 0
    }

    pub fn insert(&mut self, semitone: u8) {
        self.0 |= 1 << (semitone % 12);
    }

    pub fn remove(&mut self, semitone: u8) {
        self.0 &= !(1 << (semitone % 12));
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Element `i` is true when the interval `i` semitones above the root sounds.
    pub fn to_array(self) -> [bool; 12] {
        let mut out = [false; 12];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.contains(i as u8);
        }
        out
    }
}

/// Chord qualities in Harte shorthand, in template-library order.
///
/// A vocabulary configured with a maximum quality uses every quality up to and
/// including it. Qualities past `dim7` are rare in annotated datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Power,
    Dominant7,
    Major7,
    Minor7,
    Suspended2,
    Suspended4,
    HalfDiminished7,
    Augmented,
    Diminished,
    Diminished7,
    MajorAdd9,
    MinorAdd9,
    Major6,
    Minor6,
    Major9,
    Minor9,
    MajorAdd11,
    Dominant7Sharp9,
    Dominant9,
    Augmented7,
    Major11,
    Minor11,
    Major13,
    Minor13,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 26] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Power,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::Suspended2,
        ChordQuality::Suspended4,
        ChordQuality::HalfDiminished7,
        ChordQuality::Augmented,
        ChordQuality::Diminished,
        ChordQuality::Diminished7,
        ChordQuality::MajorAdd9,
        ChordQuality::MinorAdd9,
        ChordQuality::Major6,
        ChordQuality::Minor6,
        ChordQuality::Major9,
        ChordQuality::Minor9,
        ChordQuality::MajorAdd11,
        ChordQuality::Dominant7Sharp9,
        ChordQuality::Dominant9,
        ChordQuality::Augmented7,
        ChordQuality::Major11,
        ChordQuality::Minor11,
        ChordQuality::Major13,
        ChordQuality::Minor13,
    ];

    /// Harte spelling; added-tone qualities carry their degree list.
    pub fn shorthand(self) -> &'static str {
        match self {
            ChordQuality::Major => "maj",
            ChordQuality::Minor => "min",
            ChordQuality::Power => "5",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "min7",
            ChordQuality::Suspended2 => "sus2",
            ChordQuality::Suspended4 => "sus4",
            ChordQuality::HalfDiminished7 => "hdim7",
            ChordQuality::Augmented => "aug",
            ChordQuality::Diminished => "dim",
            ChordQuality::Diminished7 => "dim7",
            ChordQuality::MajorAdd9 => "maj(9)",
            ChordQuality::MinorAdd9 => "min(9)",
            ChordQuality::Major6 => "maj6",
            ChordQuality::Minor6 => "min6",
            ChordQuality::Major9 => "maj9",
            ChordQuality::Minor9 => "min9",
            ChordQuality::MajorAdd11 => "maj(11)",
            ChordQuality::Dominant7Sharp9 => "7(#9)",
            ChordQuality::Dominant9 => "9",
            ChordQuality::Augmented7 => "aug7",
            ChordQuality::Major11 => "maj11",
            ChordQuality::Minor11 => "min11",
            ChordQuality::Major13 => "maj13",
            ChordQuality::Minor13 => "min13",
        }
    }

    pub fn intervals(self) -> IntervalSet {
        match self {
            ChordQuality::Major => IntervalSet::from_semitones(&[0, 4, 7]),
            ChordQuality::Minor => IntervalSet::from_semitones(&[0, 3, 7]),
            ChordQuality::Power => IntervalSet::from_semitones(&[0, 7]),
            ChordQuality::Dominant7 => IntervalSet::from_semitones(&[0, 4, 7, 10]),
            ChordQuality::Major7 => IntervalSet::from_semitones(&[0, 4, 7, 11]),
            ChordQuality::Minor7 => IntervalSet::from_semitones(&[0, 3, 7, 10]),
            ChordQuality::Suspended2 => IntervalSet::from_semitones(&[0, 2, 7]),
            ChordQuality::Suspended4 => IntervalSet::from_semitones(&[0, 5, 7]),
            ChordQuality::HalfDiminished7 => IntervalSet::from_semitones(&[0, 3, 6, 10]),
            ChordQuality::Augmented => IntervalSet::from_semitones(&[0, 4, 8]),
            ChordQuality::Diminished => IntervalSet::from_semitones(&[0, 3, 6]),
            ChordQuality::Diminished7 => IntervalSet::from_semitones(&[0, 3, 6, 9]),
            ChordQuality::MajorAdd9 => IntervalSet::from_semitones(&[0, 4, 7, 2]),
            ChordQuality::MinorAdd9 => IntervalSet::from_semitones(&[0, 3, 7, 2]),
            ChordQuality::Major6 => IntervalSet::from_semitones(&[0, 4, 7, 9]),
            ChordQuality::Minor6 => IntervalSet::from_semitones(&[0, 3, 7, 9]),
            ChordQuality::Major9 => IntervalSet::from_semitones(&[0, 4, 7, 11, 2]),
            ChordQuality::Minor9 => IntervalSet::from_semitones(&[0, 3, 7, 10, 2]),
            ChordQuality::MajorAdd11 => IntervalSet::from_semitones(&[0, 4, 7, 5]),
            ChordQuality::Dominant7Sharp9 => IntervalSet::from_semitones(&[0, 4, 7, 10, 3]),
            ChordQuality::Dominant9 => IntervalSet::from_semitones(&[0, 4, 7, 10, 2]),
            ChordQuality::Augmented7 => IntervalSet::from_semitones(&[0, 4, 8, 10]),
            ChordQuality::Major11 => IntervalSet::from_semitones(&[0, 4, 7, 11, 2, 5]),
            ChordQuality::Minor11 => IntervalSet::from_semitones(&[0, 3, 7, 10, 2, 5]),
            ChordQuality::Major13 => IntervalSet::from_semitones(&[0, 4, 7, 11, 2, 9]),
            ChordQuality::Minor13 => IntervalSet::from_semitones(&[0, 3, 7, 10, 2, 5, 9]),
        }
    }

    /// Position in [`ChordQuality::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Every quality up to and including `self`.
    pub fn up_to(self) -> &'static [ChordQuality] {
        &Self::ALL[..=self.index()]
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shorthand())
    }
}

impl FromStr for ChordQuality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|q| q.shorthand() == s)
            .ok_or_else(|| ParseQualityError(s.to_string()))
    }
}

/// Harte shorthands that decompose but are not vocabulary qualities.
static EXTRA_SHORTHANDS: &[(&str, IntervalSet)] = &[
    ("1", IntervalSet::from_semitones(&[0])),
    ("minmaj7", IntervalSet::from_semitones(&[0, 3, 7, 11])),
    ("11", IntervalSet::from_semitones(&[0, 4, 7, 10, 2, 5])),
    ("13", IntervalSet::from_semitones(&[0, 4, 7, 10, 2, 9])),
];

/// Interval set of a bare shorthand token (no degree list).
pub(crate) fn shorthand_intervals(shorthand: &str) -> Option<IntervalSet> {
    if let Ok(quality) = shorthand.parse::<ChordQuality>() {
        return Some(quality.intervals());
    }
    EXTRA_SHORTHANDS
        .iter()
        .find(|(name, _)| *name == shorthand)
        .map(|(_, set)| *set)
}

/// A sounding chord: root and bass pitch classes (C=0) plus intervals above the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: u8,
    pub bass: u8,
    pub intervals: IntervalSet,
}

impl Chord {
    pub fn is_major(&self) -> bool {
        self.intervals.contains(4)
    }
}

/// What a chord label denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordIdentity {
    /// Silence or non-harmonic material (`N`)
    NoChord,
    /// Indeterminate harmony (`X`) or a label that does not parse
    Unknown,
    Chord(Chord),
}

impl ChordIdentity {
    pub fn root(&self) -> Option<u8> {
        match self {
            ChordIdentity::Chord(c) => Some(c.root),
            _ => None,
        }
    }

    pub fn bass(&self) -> Option<u8> {
        match self {
            ChordIdentity::Chord(c) => Some(c.bass),
            _ => None,
        }
    }

    pub fn is_major(&self) -> bool {
        matches!(self, ChordIdentity::Chord(c) if c.is_major())
    }
}

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

pub fn note_name(pitch_class: u8, use_flats: bool) -> &'static str {
    let idx = (pitch_class % 12) as usize;
    if use_flats {
        NOTE_NAMES_FLAT[idx]
    } else {
        NOTE_NAMES_SHARP[idx]
    }
}

/// Decompose a canonical label into its chord identity.
///
/// Never fails: anything that is not valid Harte syntax is `Unknown`.
pub fn decompose(label: &str) -> ChordIdentity {
    match label {
        NO_CHORD => ChordIdentity::NoChord,
        UNKNOWN_CHORD => ChordIdentity::Unknown,
        _ => harte::parse_chord
            .parse(label)
            .map(ChordIdentity::Chord)
            .unwrap_or(ChordIdentity::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(label: &str) -> Chord {
        match decompose(label) {
            ChordIdentity::Chord(c) => c,
            other => panic!("{label} decomposed to {other:?}"),
        }
    }

    #[test]
    fn sentinels_are_distinct() {
        assert_eq!(decompose("N"), ChordIdentity::NoChord);
        assert_eq!(decompose("X"), ChordIdentity::Unknown);
        assert_ne!(ChordIdentity::NoChord, ChordIdentity::Unknown);
        assert_eq!(decompose("N").root(), None);
        assert_eq!(decompose("X").bass(), None);
    }

    #[test]
    fn c_major() {
        let c = chord("C:maj");
        assert_eq!(c.root, 0);
        assert_eq!(c.bass, 0);
        assert_eq!(c.intervals, ChordQuality::Major.intervals());
        assert!(c.is_major());
        assert_eq!(
            c.intervals.to_array(),
            [true, false, false, false, true, false, false, true, false, false, false, false]
        );
    }

    #[test]
    fn bare_root_is_major() {
        assert_eq!(chord("G").intervals, ChordQuality::Major.intervals());
        assert_eq!(chord("G").root, 7);
    }

    #[test]
    fn minor_with_inversion() {
        let c = chord("A:min/b3");
        assert_eq!(c.root, 9);
        assert_eq!(c.bass, 0); // C
        assert!(!c.is_major());

        // /3 is a major third above the root in Harte degrees
        assert_eq!(chord("A:min/3").bass, 1);
        assert_eq!(chord("C:maj/5").bass, 7);
    }

    #[test]
    fn accidentals_wrap_around() {
        assert_eq!(chord("Cb:maj").root, 11);
        assert_eq!(chord("B#:maj").root, 0);
        assert_eq!(chord("Bb:min").root, 10);
        assert_eq!(chord("F##:maj").root, 7);
        assert_eq!(chord("Ebb:maj").root, 2);
    }

    #[test]
    fn degree_lists_extend_and_omit() {
        let c = chord("C:maj(9)");
        assert!(c.intervals.contains(2));
        assert_eq!(c.intervals.len(), 4);

        let c = chord("C:maj7(*5)");
        assert!(!c.intervals.contains(7));
        assert_eq!(c.intervals.len(), 3);

        let c = chord("D:(1,b3,5)");
        assert_eq!(c.intervals, ChordQuality::Minor.intervals());
    }

    #[test]
    fn extra_shorthands_decompose() {
        assert_eq!(
            chord("C:minmaj7").intervals,
            IntervalSet::from_semitones(&[0, 3, 7, 11])
        );
        assert_eq!(chord("E:1").intervals.len(), 1);
    }

    #[test]
    fn garbage_is_unknown() {
        for label in ["", "H:maj", "C:foo", "Cmin", "C:maj(9", "C:maj/", "C:maj/14", "c:maj"] {
            assert_eq!(decompose(label), ChordIdentity::Unknown, "{label}");
        }
    }

    #[test]
    fn quality_shorthands_round_trip() {
        for q in ChordQuality::ALL {
            assert_eq!(q.shorthand().parse::<ChordQuality>().unwrap(), q);
        }
        assert!("maj7b5".parse::<ChordQuality>().is_err());
        assert!("min11(9)".parse::<ChordQuality>().is_err());
    }

    #[test]
    fn quality_interval_sets_are_distinct() {
        for (i, a) in ChordQuality::ALL.iter().enumerate() {
            for b in &ChordQuality::ALL[i + 1..] {
                assert_ne!(a.intervals(), b.intervals(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn up_to_is_a_prefix() {
        assert_eq!(ChordQuality::Major.up_to(), &[ChordQuality::Major]);
        assert_eq!(
            ChordQuality::Minor.up_to(),
            &[ChordQuality::Major, ChordQuality::Minor]
        );
        assert_eq!(ChordQuality::HalfDiminished7.up_to().len(), 9);
        assert_eq!(ChordQuality::Diminished7.up_to().len(), 12);
        assert_eq!(ChordQuality::Major6.up_to().len(), 15);
        assert_eq!(ChordQuality::Dominant9.up_to().len(), 21);
        assert_eq!(ChordQuality::Minor13.up_to().len(), 26);
        assert_eq!(ChordQuality::Minor13.up_to(), &ChordQuality::ALL[..]);
    }

    #[test]
    fn added_tone_spellings_decompose_to_their_quality() {
        for q in ChordQuality::ALL {
            let label = format!("C:{}", q.shorthand());
            assert_eq!(chord(&label).intervals, q.intervals(), "{label}");
        }
        assert_eq!("7(#9)".parse::<ChordQuality>().unwrap(), ChordQuality::Dominant7Sharp9);
        assert_eq!("min13".parse::<ChordQuality>().unwrap(), ChordQuality::Minor13);
    }

    #[test]
    fn flat_spelling() {
        assert_eq!(note_name(1, true), "Db");
        assert_eq!(note_name(1, false), "C#");
    }
}
