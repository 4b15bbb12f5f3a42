//! Replays a JSON signal script against a headless viewport and reports
//! what was drawn.
//!
//! Usage: `viewport-sync <script.json> [--config <config.json>]`

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use viewport_sync::config::{load_config_from_file, ConfigError};
use viewport_sync::signals::script::{load_script_from_file, Replay, ScriptError};
use viewport_sync::{EditorState, SignalBus, Viewport, ViewportConfig, ViewportSynchronizer};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("script: {0}")]
    Script(#[from] ScriptError),
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Replay an editor signal script against a headless viewport")]
struct Args {
    /// JSON replay script
    script: PathBuf,

    /// Viewport configuration (JSON); defaults apply when omitted
    #[clap(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            load_config_from_file(path)?
        }
        None => ViewportConfig::default(),
    };
    let script = load_script_from_file(&args.script)?;
    log::info!(
        "Loaded {} ({} signals)",
        args.script.display(),
        script.signals.len()
    );

    let viewport = Viewport::new(&config);
    let editor = EditorState::new(viewport.camera);
    let viewport = Rc::new(RefCell::new(viewport));
    let editor = Rc::new(RefCell::new(editor));

    let replay = {
        let mut viewport = viewport.borrow_mut();
        let mut editor = editor.borrow_mut();
        Replay::build(&script, &mut viewport, &mut editor)?
    };

    let mut bus = SignalBus::new();
    let _synchronizer = ViewportSynchronizer::new(&mut bus, Rc::clone(&viewport), Rc::clone(&editor));
    let summary = replay.run(&script, &mut bus, &viewport, &editor)?;

    log::info!(
        "Replayed {} signals, {} frames drawn",
        summary.signals,
        summary.frames
    );
    log::info!("Render stats: {}", viewport.borrow().stats().summary());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
