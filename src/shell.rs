//! Line-oriented shell around one annotation session

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::annotations::handlers::{Reply, handle_msg};
use crate::dialog::PathPicker;
use crate::session::commands::parse_command;
use crate::session::state::AnnotationSession;

/// Read commands until `quit` or end of input.
///
/// A failing command is reported and the loop continues with the session
/// untouched. Input that is not UTF-8 is reported the same way. Only I/O
/// failures on `input`/`output` end the loop with an error.
pub fn run<R: BufRead, W: Write>(
    session: &mut AnnotationSession,
    picker: &mut dyn PathPicker,
    input: R,
    mut output: W,
    prompt: bool,
) -> Result<()> {
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(output, "hans> ")?;
            output.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = match line {
            Ok(line) => line,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                log::error!("Unreadable command: {}", err);
                writeln!(output, "error: {err}")?;
                continue;
            }
            Err(err) => return Err(err).context("Failed to read command"),
        };

        let msg = match parse_command(&line) {
            Ok(Some(msg)) => msg,
            Ok(None) => continue,
            Err(err) => {
                writeln!(output, "error: {err}")?;
                continue;
            }
        };

        match handle_msg(session, picker, msg) {
            Ok(Reply::Text(text)) => writeln!(output, "{text}")?,
            Ok(Reply::Done) => {}
            Ok(Reply::Quit) => break,
            Err(err) => {
                log::error!("Command '{}' failed: {}", line.trim(), err);
                writeln!(output, "error: {err}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HansConfig;
    use crate::dialog::Headless;
    use crate::render::pipeline::save_rgba;
    use crate::render::text::test_typeface;
    use image::{Rgba, RgbaImage};

    fn run_script(session: &mut AnnotationSession, script: &str) -> String {
        let mut out = Vec::new();
        run(session, &mut Headless, script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_errors_do_not_stop_the_shell() {
        let mut session = AnnotationSession::new(&HansConfig::default());
        let out = run_script(&mut session, "bogus\nline 10\nfreq 500\nstatus\n");
        assert!(out.contains("error: unknown command 'bogus'"));
        assert!(out.contains("error: no image loaded"));
        assert!(out.contains("frequency: 500"));
    }

    #[test]
    fn test_invalid_utf8_line_is_reported() {
        let mut session = AnnotationSession::new(&HansConfig::default());
        let mut input = b"freq 1\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"duration 2\nstatus\n");

        let mut out = Vec::new();
        run(&mut session, &mut Headless, input.as_slice(), &mut out, false).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("error:"), "{out}");
        assert!(out.contains("frequency: 1"));
        assert!(out.contains("duration:  2"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut session = AnnotationSession::new(&HansConfig::default());
        let out = run_script(&mut session, "quit\nfreq 1\n");
        assert!(out.is_empty());
        assert_eq!(session.labels().frequency, "");
    }

    #[test]
    fn test_full_script() {
        let typeface = test_typeface();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        save_rgba(&RgbaImage::from_pixel(300, 80, Rgba([0, 0, 0, 255])), &input).unwrap();

        let mut session = AnnotationSession::new(&HansConfig::default()).with_typeface(typeface);
        let script = format!(
            "load {}\nfreq 8000\nduration 1.2\nline 100\nline 200\ntool letter\nletter á\nclick 120\nput 10 óó\nsave {}\n",
            input.display(),
            output.display()
        );
        let out = run_script(&mut session, &script);

        assert!(!out.contains("error"), "{out}");
        assert!(out.contains("Saved"));
        let saved = image::open(&output).unwrap();
        assert_eq!((saved.width(), saved.height()), (390, 170));
    }
}
