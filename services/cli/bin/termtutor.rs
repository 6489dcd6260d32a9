//! Main Entrypoint for termtutor
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and the command line.
//! 2. Initializing logging.
//! 3. Building the content generator, progress store and tutoring session.
//! 4. Resuming the previous session and running the interactive read loop.

use anyhow::Context;
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io;
use std::path::PathBuf;
use termtutor_cli::config::Config;
use termtutor_cli::shell::{Flow, PROMPT, Shell};
use termtutor_core::{
    ChatCompletionsGenerator, FileProgressStore, InMemoryProgressStore, TrackRegistry,
    TutorSession,
};
use tracing::{debug, info, warn};

/// An interactive terminal tutor for Git, Docker and Linux.
#[derive(Parser, Debug)]
#[command(name = "termtutor", version, about, long_about = None)]
struct Args {
    /// Progress file to use instead of TUTOR_PROGRESS_FILE or ~/.termtutor-progress.json
    #[arg(long, value_name = "PATH")]
    progress_file: Option<PathBuf>,

    /// Do not resume the saved module on startup
    #[arg(long)]
    no_resume: bool,

    /// Keep progress in memory only
    #[arg(long)]
    no_save: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .init();
    info!(model = %config.model, endpoint = %config.api_url, "Configuration loaded");

    // --- 3. Build the Session ---
    let generator = ChatCompletionsGenerator::new(config.generator_config())
        .context("Failed to build the generation client")?;
    let registry = TrackRegistry::builtin();
    let session = match (args.no_save, args.progress_file.or(config.progress_file)) {
        (false, Some(path)) => {
            let store = FileProgressStore::new(path);
            info!(path = %store.path().display(), "Saving progress to file");
            TutorSession::new(registry, generator, store)
        }
        (false, None) => {
            warn!("No home directory found; progress will not be saved");
            TutorSession::new(registry, generator, InMemoryProgressStore::new())
        }
        (true, _) => TutorSession::new(registry, generator, InMemoryProgressStore::new()),
    };

    // --- 4. Run the Shell ---
    let mut editor = DefaultEditor::new().context("Failed to initialize the terminal")?;
    let mut shell = Shell::new(session, io::stdout());
    shell.welcome()?;
    if !args.no_resume {
        shell.resume()?;
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        debug!(error = %e, "Could not record history entry");
                    }
                }
                if shell.handle_line(&line)? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    info!("Shell closed");
    Ok(())
}
