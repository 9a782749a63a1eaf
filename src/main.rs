/// Entry point: config, logging, host device, then the session loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::color::Palette;
use sim::controller::SessionController;
use ui::board::BoardRenderer;
use ui::host::HostDevice;

fn main() -> ExitCode {
    let (config, warnings) = GameConfig::load();
    let logging = init_logging(&config);

    for w in &warnings {
        if logging {
            warn!("{w}");
        } else {
            eprintln!("config: {w}");
        }
    }

    let mut hw = HostDevice::new(&config);
    if let Err(e) = hw.init() {
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let mut controller = SessionController::new(
        hw,
        rand::thread_rng(),
        BoardRenderer::new(Palette::load(config.palette)),
        config.turn_config(),
        config.timing.reaction_delay_secs,
    );

    let result = controller.run_forever();
    let sessions = controller.sessions_played();

    let mut hw = controller.into_hardware();
    if let Err(e) = hw.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Err(e) if e.is_interrupt() => {
            info!(sessions, "quit");
        }
        Err(e) => {
            error!(error = %e, "game stopped");
            eprintln!("Game error: {e}");
            return ExitCode::FAILURE;
        }
        Ok(()) => {}
    }

    println!();
    println!("Thanks for playing DO SAME!");
    println!("Games played: {sessions}");
    ExitCode::SUCCESS
}

/// Install a file-backed subscriber when `[general] log_file` is set.
/// `DOSAME_LOG` overrides the configured filter.
fn init_logging(config: &GameConfig) -> bool {
    let Some(path) = &config.log_file else {
        return false;
    };
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("could not open log file {}: {e}", path.display());
            return false;
        }
    };
    let filter = EnvFilter::try_from_env("DOSAME_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    true
}
