//! Annotation types for marking up spectrograms
//!
//! All positions are horizontal coordinates in source-image space:
//! 0 is the left edge of the loaded bitmap, the border is not included.

use super::buckets;

/// Vertical timing line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub position: f32,
}

impl Line {
    pub fn new(position: f32) -> Self {
        Self { position }
    }
}

/// Phonetic letter label placed under the spectrogram
#[derive(Clone, Debug, PartialEq)]
pub struct Letter {
    pub label: String,
    /// Raw click position, never overwritten by re-bucketing
    pub position: f32,
}

impl Letter {
    pub fn new(label: impl Into<String>, position: f32) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// Lines and letters of one edit session, in insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationModel {
    pub lines: Vec<Line>,
    pub letters: Vec<Letter>,
}

impl AnnotationModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, position: f32) {
        self.lines.push(Line::new(position));
    }

    pub fn add_letter(&mut self, label: impl Into<String>, position: f32) {
        self.letters.push(Letter::new(label, position));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.letters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.letters.is_empty()
    }

    /// Letters with their displayed positions for the range
    /// `[range_start, range_end]`. Stored raw positions are untouched.
    pub fn rebucketed(&self, range_start: f32, range_end: f32) -> Vec<Letter> {
        buckets::recalculate_letter_positions(&self.lines, &self.letters, range_start, range_end)
    }
}
