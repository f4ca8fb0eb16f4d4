//! Message types for the annotation session

use std::path::PathBuf;

use super::state::Tool;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Open a spectrogram, asking the picker when no path is given
    Load(Option<PathBuf>),
    /// Export the annotated picture, asking the picker when no path is given
    Save(Option<PathBuf>),
    /// Write the live preview as it looks right now
    Preview(PathBuf),
    SetFrequency(String),
    SetDuration(String),
    /// Letter placed by subsequent letter clicks
    SetLetter(String),
    SelectTool(Tool),
    /// Place a line or letter at source-image x, depending on the tool
    Click(f32),
    /// Place a line regardless of the tool
    AddLine(f32),
    /// Place a letter regardless of the tool, with the current letter
    /// unless one is given
    AddLetter(f32, Option<String>),
    /// Remove all lines and letters
    Clear,
    Status,
    Help,
    Quit,
}
