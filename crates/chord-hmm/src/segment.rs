//! Annotation files to ordered chord segments.

use serde::{Deserialize, Serialize};

use crate::chord::NO_CHORD;
use crate::feedback::{FeedbackCollector, ParseResult};
use crate::label;

/// One chord held from `start_time` to `end_time` (seconds).
///
/// `end_time > start_time` always holds; parsers drop anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSegment {
    start_time: f64,
    end_time: f64,
    label: String,
}

impl ChordSegment {
    /// Build a segment, or `None` if the times are not a finite, non-negative,
    /// strictly increasing pair.
    pub fn new(start_time: f64, end_time: f64, label: impl Into<String>) -> Option<Self> {
        if !start_time.is_finite() || !end_time.is_finite() {
            return None;
        }
        if start_time < 0.0 || end_time <= start_time {
            return None;
        }
        Some(Self {
            start_time,
            end_time,
            label: label.into(),
        })
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn is_no_chord(&self) -> bool {
        self.label == NO_CHORD
    }
}

/// An annotation file format.
///
/// Formats own their line grammar; label repair defaults to the shared
/// normalizer.
pub trait AnnotationFormat {
    fn name(&self) -> &'static str;

    /// File extensions (without the dot) used when discovering a dataset.
    fn extensions(&self) -> &[&'static str];

    fn normalize(&self, raw_label: &str) -> String {
        label::normalize(raw_label)
    }

    fn parse(&self, content: &str) -> ParseResult<Vec<ChordSegment>>;
}

/// Whitespace-separated `start end label` lines, as in `.lab` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabFormat;

impl AnnotationFormat for LabFormat {
    fn name(&self) -> &'static str {
        "lab"
    }

    fn extensions(&self) -> &[&'static str] {
        &["lab", "txt"]
    }

    fn parse(&self, content: &str) -> ParseResult<Vec<ChordSegment>> {
        let mut collector = FeedbackCollector::new();
        let mut segments = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            collector.set_line(idx + 1);

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let &[start, end, raw_label] = fields.as_slice() else {
                collector.info(format!("expected 3 fields, found {}", fields.len()));
                continue;
            };

            let Some(start) = parse_time(start) else {
                collector.warning(format!("start time '{start}' is not a number of seconds"));
                continue;
            };
            let Some(end) = parse_time(end) else {
                collector.warning(format!("end time '{end}' is not a number of seconds"));
                continue;
            };
            if start < 0.0 {
                collector.warning(format!("negative start time {start}"));
                continue;
            }
            if end <= start {
                collector.warning_with_suggestion(
                    format!("segment ends at {end} but starts at {start}"),
                    "check for swapped or duplicated timestamps",
                );
                continue;
            }

            let label = self.normalize(raw_label);
            match ChordSegment::new(start, end, label) {
                Some(segment) => segments.push(segment),
                None => collector.warning("unusable segment times"),
            }
        }

        ParseResult::new(segments, collector.into_feedback())
    }
}

/// Parse a finite seconds value. `inf` and `NaN` are rejected.
fn parse_time(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|t| t.is_finite())
}
