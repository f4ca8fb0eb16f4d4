//! Shell command lines to session messages

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use super::messages::Msg;
use super::state::Tool;

pub const HELP: &str = "\
load [PATH]           open a PNG spectrogram (file dialog without PATH)
save [PATH]           export the annotated PNG (file dialog without PATH)
preview PATH          write the live preview
freq TEXT             frequency label, drawn as 'Frekvence 0–TEXT Hz'
duration TEXT         duration label, drawn as 'Trvání TEXT s'
letter TEXT           letter placed by letter clicks
tool line|letter      what a click places
click X               place a line or letter at image x
line X                place a line at image x
put X [TEXT]          place a letter at image x
clear                 remove all lines and letters
status                show the session
help                  show this text
quit                  leave";

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Msg>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let msg = match command.to_lowercase().as_str() {
        "load" | "open" => Msg::Load(optional_path(rest)),
        "save" | "export" => Msg::Save(optional_path(rest)),
        "preview" => {
            let Some(path) = optional_path(rest) else {
                bail!("preview needs a path");
            };
            Msg::Preview(path)
        }
        "freq" | "frequency" => Msg::SetFrequency(rest.to_string()),
        "duration" => Msg::SetDuration(rest.to_string()),
        "letter" => Msg::SetLetter(rest.to_string()),
        "tool" => Msg::SelectTool(parse_tool(rest)?),
        "click" => Msg::Click(parse_position(rest)?),
        "line" => Msg::AddLine(parse_position(rest)?),
        "put" => {
            let (x, label) = match rest.split_once(char::is_whitespace) {
                Some((x, label)) => (x, Some(label.trim().to_string())),
                None => (rest, None),
            };
            Msg::AddLetter(parse_position(x)?, label)
        }
        "clear" => Msg::Clear,
        "status" | "print" => Msg::Status,
        "help" | "?" => Msg::Help,
        "quit" | "exit" | "q" => Msg::Quit,
        other => bail!("unknown command '{other}', try 'help'"),
    };
    Ok(Some(msg))
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

fn parse_tool(rest: &str) -> Result<Tool> {
    match rest.to_lowercase().as_str() {
        "line" | "lines" => Ok(Tool::Line),
        "letter" | "letters" => Ok(Tool::Letter),
        other => bail!("unknown tool '{other}', expected 'line' or 'letter'"),
    }
}

fn parse_position(text: &str) -> Result<f32> {
    let x: f32 = text
        .parse()
        .with_context(|| format!("'{text}' is not a position"))?;
    if !x.is_finite() {
        bail!("'{text}' is not a finite position");
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Msg {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comments() {
        assert!(parse_command("").unwrap().is_none());
        assert!(parse_command("   ").unwrap().is_none());
        assert!(parse_command("# lines for the first word").unwrap().is_none());
    }

    #[test]
    fn test_paths() {
        assert_eq!(parse("load"), Msg::Load(None));
        assert_eq!(
            parse("load /tmp/my spectrogram.png"),
            Msg::Load(Some(PathBuf::from("/tmp/my spectrogram.png")))
        );
        assert_eq!(parse("save out.png"), Msg::Save(Some(PathBuf::from("out.png"))));
        assert_eq!(parse("preview p.png"), Msg::Preview(PathBuf::from("p.png")));
        assert!(parse_command("preview").is_err());
    }

    #[test]
    fn test_text_fields_keep_inner_spaces() {
        assert_eq!(parse("freq 8000"), Msg::SetFrequency("8000".to_string()));
        assert_eq!(parse("duration"), Msg::SetDuration(String::new()));
        assert_eq!(
            parse("letter další písmeno"),
            Msg::SetLetter("další písmeno".to_string())
        );
    }

    #[test]
    fn test_tools() {
        assert_eq!(parse("tool line"), Msg::SelectTool(Tool::Line));
        assert_eq!(parse("TOOL Letter"), Msg::SelectTool(Tool::Letter));
        assert!(parse_command("tool brush").is_err());
    }

    #[test]
    fn test_positions() {
        assert_eq!(parse("click 12.5"), Msg::Click(12.5));
        assert_eq!(parse("line 300"), Msg::AddLine(300.0));
        assert_eq!(parse("put 40"), Msg::AddLetter(40.0, None));
        assert_eq!(
            parse("put 40 óó"),
            Msg::AddLetter(40.0, Some("óó".to_string()))
        );
        assert!(parse_command("click").is_err());
        assert!(parse_command("line abc").is_err());
        assert!(parse_command("line NaN").is_err());
        assert!(parse_command("line inf").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("rotate 90").unwrap_err();
        assert!(err.to_string().contains("rotate"));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("clear"), Msg::Clear);
        assert_eq!(parse("status"), Msg::Status);
        assert_eq!(parse("help"), Msg::Help);
        assert_eq!(parse("quit"), Msg::Quit);
    }
}
