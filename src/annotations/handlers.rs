//! Session message handlers
//!
//! Applies one `Msg` to an `AnnotationSession`. Failures leave the
//! session as it was; the caller reports them and carries on.

use crate::dialog::PathPicker;
use crate::error::Result;
use crate::session::commands::HELP;
use crate::session::messages::Msg;
use crate::session::state::AnnotationSession;

/// What the shell should do after a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this and continue
    Text(String),
    /// Nothing to report
    Done,
    Quit,
}

pub fn handle_msg(
    session: &mut AnnotationSession,
    picker: &mut dyn PathPicker,
    msg: Msg,
) -> Result<Reply> {
    match msg {
        Msg::Load(path) => {
            let Some(path) = path.or_else(|| picker.pick_source()) else {
                log::info!("No file was selected");
                return Ok(Reply::Done);
            };
            session.load(&path)?;
            Ok(Reply::Text(format!("Loaded {}", path.display())))
        }
        Msg::Save(path) => {
            let Some(path) = path.or_else(|| picker.pick_destination()) else {
                log::info!("No destination was selected, nothing saved");
                return Ok(Reply::Done);
            };
            session.save(&path)?;
            Ok(Reply::Text(format!("Saved {}", path.display())))
        }
        Msg::Preview(path) => {
            session.write_preview(&path)?;
            Ok(Reply::Text(format!("Preview written to {}", path.display())))
        }
        Msg::SetFrequency(text) => {
            session.set_frequency(&text)?;
            Ok(Reply::Done)
        }
        Msg::SetDuration(text) => {
            session.set_duration(&text)?;
            Ok(Reply::Done)
        }
        Msg::SetLetter(text) => {
            session.set_letter(&text)?;
            Ok(Reply::Done)
        }
        Msg::SelectTool(tool) => {
            session.set_tool(tool);
            Ok(Reply::Done)
        }
        Msg::Click(x) => {
            session.click(x)?;
            Ok(Reply::Done)
        }
        Msg::AddLine(x) => {
            session.add_line(x)?;
            Ok(Reply::Done)
        }
        Msg::AddLetter(x, label) => {
            let label = label.unwrap_or_else(|| session.letter().to_string());
            session.add_letter(x, &label)?;
            Ok(Reply::Done)
        }
        Msg::Clear => {
            session.clear()?;
            Ok(Reply::Done)
        }
        Msg::Status => Ok(Reply::Text(session.status().to_string())),
        Msg::Help => Ok(Reply::Text(HELP.to_string())),
        Msg::Quit => Ok(Reply::Quit),
    }
}
