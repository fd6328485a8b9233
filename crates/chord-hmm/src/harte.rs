//! Harte chord syntax using winnow combinators.
//!
//! ```text
//! chord    := root (":" quality)? ("/" degree)?
//! root     := [A-G] accidental*
//! quality  := shorthand degrees? | degrees
//! degrees  := "(" ("*"? degree ("," "*"? degree)*)? ")"
//! degree   := accidental* [1-13]
//! ```

use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, delimited, opt, preceded, repeat, separated};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::chord::{shorthand_intervals, Chord, ChordQuality, IntervalSet};

type PResult<T> = winnow::ModalResult<T>;

/// Semitones above the root of each natural scale degree.
const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// One entry of a parenthesised degree list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DegreeEdit {
    Add(u8),
    Omit(u8),
}

/// Parse `b` (down a semitone) or `#` (up a semitone).
fn parse_accidental(input: &mut &str) -> PResult<i32> {
    alt(('b'.value(-1), '#'.value(1))).parse_next(input)
}

fn parse_accidentals(input: &mut &str) -> PResult<i32> {
    let shifts: Vec<i32> = repeat(0.., parse_accidental).parse_next(input)?;
    Ok(shifts.iter().sum())
}

/// Parse a root note name to its pitch class (C = 0).
pub fn parse_root(input: &mut &str) -> PResult<u8> {
    let natural: i32 = alt((
        'C'.value(0),
        'D'.value(2),
        'E'.value(4),
        'F'.value(5),
        'G'.value(7),
        'A'.value(9),
        'B'.value(11),
    ))
    .parse_next(input)?;
    let shift = parse_accidentals(input)?;
    Ok((natural + shift).rem_euclid(12) as u8)
}

/// Parse a scale degree like `b3`, `5`, `#11` to semitones above the root.
pub fn parse_degree(input: &mut &str) -> PResult<u8> {
    let shift = parse_accidentals(input)?;
    let degree: usize = digit1
        .parse_to::<usize>()
        .verify(|d: &usize| (1..=13).contains(d))
        .parse_next(input)?;
    Ok((MAJOR_SCALE[(degree - 1) % 7] + shift).rem_euclid(12) as u8)
}

fn parse_degree_edit(input: &mut &str) -> PResult<DegreeEdit> {
    let omitted = opt('*').parse_next(input)?.is_some();
    let semitones = parse_degree(input)?;
    Ok(if omitted {
        DegreeEdit::Omit(semitones)
    } else {
        DegreeEdit::Add(semitones)
    })
}

fn parse_degree_list(input: &mut &str) -> PResult<Vec<DegreeEdit>> {
    delimited(
        '(',
        separated(0.., delimited(space0, parse_degree_edit, space0), ','),
        ')',
    )
    .parse_next(input)
}

/// Parse a shorthand token (`maj`, `hdim7`, `minmaj7`) to its interval set.
fn parse_shorthand(input: &mut &str) -> PResult<IntervalSet> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric())
        .verify_map(shorthand_intervals)
        .parse_next(input)
}

fn apply_edits(mut set: IntervalSet, edits: &[DegreeEdit]) -> IntervalSet {
    for edit in edits {
        match *edit {
            DegreeEdit::Add(semitones) => set.insert(semitones),
            DegreeEdit::Omit(semitones) => set.remove(semitones),
        }
    }
    set
}

/// Parse `:quality`, either a shorthand with optional degree list or a bare
/// degree list spelling out every interval.
fn parse_quality(input: &mut &str) -> PResult<IntervalSet> {
    ':'.parse_next(input)?;
    alt((
        (parse_shorthand, opt(parse_degree_list))
            .map(|(set, edits)| apply_edits(set, &edits.unwrap_or_default())),
        parse_degree_list.map(|edits| apply_edits(IntervalSet::EMPTY, &edits)),
    ))
    .parse_next(input)
}

fn parse_bass(input: &mut &str) -> PResult<u8> {
    preceded('/', parse_degree).parse_next(input)
}

/// Parse a full chord label. A bare root is a major triad.
pub fn parse_chord(input: &mut &str) -> PResult<Chord> {
    let root = parse_root(input)?;
    let intervals = opt(parse_quality)
        .parse_next(input)?
        .unwrap_or_else(|| ChordQuality::Major.intervals());
    let bass = opt(parse_bass)
        .parse_next(input)?
        .map_or(root, |semitones| (root + semitones) % 12);

    Ok(Chord {
        root,
        bass,
        intervals,
    })
}
