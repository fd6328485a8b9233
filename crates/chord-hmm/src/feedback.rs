//! Line-level parse feedback.
//!
//! Annotation parsing is generous: a bad line is reported and skipped, the
//! rest of the file still parses. Callers decide what to do with the notes.

use serde::{Deserialize, Serialize};

/// A single note about one annotation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
    /// 1-based line number in the annotation file
    pub line: usize,
    pub suggestion: Option<String>,
}

impl Feedback {
    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Feedback {
            level: FeedbackLevel::Warning,
            message: message.into(),
            line,
            suggestion: None,
        }
    }

    pub fn info(message: impl Into<String>, line: usize) -> Self {
        Feedback {
            level: FeedbackLevel::Info,
            message: message.into(),
            line,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// Line carried data but it was unusable and has been dropped
    Warning,
    /// Line did not look like a segment at all (wrong field count)
    Info,
}

/// Collector for feedback while walking an annotation file.
#[derive(Debug, Default)]
pub struct FeedbackCollector {
    feedback: Vec<Feedback>,
    current_line: usize,
}

impl FeedbackCollector {
    pub fn new() -> Self {
        FeedbackCollector {
            feedback: Vec::new(),
            current_line: 1,
        }
    }

    pub fn set_line(&mut self, line: usize) {
        self.current_line = line;
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.feedback
            .push(Feedback::warning(message, self.current_line));
    }

    pub fn warning_with_suggestion(
        &mut self,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.feedback.push(
            Feedback::warning(message, self.current_line).with_suggestion(suggestion),
        );
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.feedback.push(Feedback::info(message, self.current_line));
    }

    pub fn into_feedback(self) -> Vec<Feedback> {
        self.feedback
    }
}

/// Parsed value plus whatever was skipped on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult<T> {
    pub value: T,
    pub feedback: Vec<Feedback>,
}

impl<T> ParseResult<T> {
    pub fn new(value: T, feedback: Vec<Feedback>) -> Self {
        ParseResult { value, feedback }
    }

    /// Lines that held a segment which had to be dropped.
    pub fn warnings(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Warning)
    }

    /// Lines skipped because they were not three fields.
    pub fn skipped(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Info)
    }
}
