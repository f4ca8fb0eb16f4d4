mod annotations;
mod config;
mod dialog;
mod domain;
mod error;
mod render;
mod session;
mod shell;
mod source;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use config::HansConfig;
use session::state::AnnotationSession;

/// Annotate spectrograms with timing lines and letters.
///
/// Commands are read from SCRIPT, or from standard input when no script is
/// given. Type 'help' for the list of commands.
#[derive(Parser, Debug)]
#[command(name = "hans", version)]
struct Cli {
    /// File with one command per line
    script: Option<PathBuf>,

    /// Write the current settings to the config file and exit
    #[arg(long, conflicts_with = "script")]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = HansConfig::load();
    if cli.init_config {
        config.save();
        return Ok(());
    }

    let mut session = AnnotationSession::new(&config);
    let mut picker = dialog::default_picker();
    let stdout = io::stdout().lock();

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script: {}", path.display()))?;
            shell::run(&mut session, picker.as_mut(), BufReader::new(file), stdout, false)
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            shell::run(&mut session, picker.as_mut(), stdin.lock(), stdout, prompt)
        }
    }
}
