//! Free-text fields embedded into the exported picture

use crate::error::{Error, Result};

/// Which text field a value belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    Frequency,
    Duration,
    Letter,
}

impl TextField {
    pub fn name(self) -> &'static str {
        match self {
            TextField::Frequency => "frequency",
            TextField::Duration => "duration",
            TextField::Letter => "letter",
        }
    }
}

/// Check a user-entered string before it is drawn.
///
/// Text must fit in `max_chars` characters and contain no control
/// characters; line breaks would be drawn over each other in the margin.
/// Letters additionally must not be blank.
pub fn validate(field: TextField, text: &str, max_chars: usize) -> Result<String> {
    let rejected = |reason: String| Error::TextRejected {
        field: field.name(),
        reason,
    };

    let count = text.chars().count();
    if count > max_chars {
        return Err(rejected(format!(
            "{count} characters, at most {max_chars} allowed"
        )));
    }
    if let Some(c) = text.chars().find(|c| c.is_control()) {
        return Err(rejected(format!("contains control character {c:?}")));
    }
    if field == TextField::Letter && text.trim().is_empty() {
        return Err(rejected("letter must not be empty".to_string()));
    }

    Ok(text.to_string())
}

/// Frequency and duration text shown around the spectrogram
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels {
    pub frequency: String,
    pub duration: String,
}

impl Labels {
    pub fn new(frequency: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            frequency: frequency.into(),
            duration: duration.into(),
        }
    }

    /// Vertical axis label, drawn rotated in the left margin
    pub fn frequency_label(&self) -> String {
        format!("Frekvence 0–{} Hz", self.frequency)
    }

    /// Horizontal axis label, drawn above the top-right corner
    pub fn duration_label(&self) -> String {
        format!("Trvání {} s", self.duration)
    }
}
