//! InkRoom Application
//!
//! Headless application shell: configuration, keyboard shortcuts, the
//! session that wires input to the canvas and renderer, and scripted replay.

mod config;
pub mod script;
mod session;
mod shortcuts;

pub use config::{AppConfig, ConfigError};
pub use script::{ReplaySummary, ScriptError, ScriptEvent};
pub use session::Session;
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};

use clap::Parser;
use inkroom_render::DisplayList;
use std::path::PathBuf;
use thiserror::Error;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Top-level application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("Failed to serialize drawing: {0}")]
    Output(#[from] serde_json::Error),
}

/// Parsed command line.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "inkroom", about = "Replay a whiteboard event script headlessly")]
pub struct CliArgs {
    /// JSON config file; defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the keyboard shortcuts.
    #[arg(long)]
    pub shortcuts: bool,

    /// JSON event script to replay.
    #[arg(required_unless_present = "shortcuts")]
    pub script: Option<PathBuf>,
}

/// Replay the script named on the command line and return the final drawing
/// as pretty JSON. Returns `None` when there was nothing to replay.
pub fn run(args: &CliArgs) -> Result<Option<String>, AppError> {
    if args.shortcuts {
        ShortcutRegistry::print_all();
    }
    let Some(script_path) = &args.script else {
        return Ok(None);
    };

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let events = script::load(script_path)?;
    let mut session = Session::new(config, DisplayList::new())?;
    let summary = script::run(&mut session, &events, Instant::now())?;
    log::info!(
        "Final drawing: {} record(s), {} snapshot(s), {} frame(s) painted",
        session.state().len(),
        session.canvas().history().snapshot_count(),
        session.renderer().frames()
    );
    log::debug!("{:?}", summary);

    Ok(Some(session.state().to_json()?))
}
