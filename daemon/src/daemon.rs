//! Looper entry
//!
//! Loads the configuration, sets up logging and signal handling, builds the configured
//! collaborators and hands them to the [`Runner`].
//! Failures here are fatal: without a configuration nothing can run.

use clap::Parser;
use std::sync::Arc;
use thiserror::Error;

use crate::backends::Player;
use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::display::Display;
use crate::overlay::Overlay;
use crate::runner::keyboard::Keyboard;
use crate::runner::shutdown::{self, Shutdown};
use crate::runner::{Runner, Settings};
use crate::sources::Source;

#[derive(Debug, Error)]
pub enum LooperError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to set up logging: {0}")]
    Logger(#[from] fern::InitError),
    #[error("failed to install signal handlers: {0}")]
    Signal(#[from] nix::Error),
}

/// Maps the configuration and `-v` flags to a log level.
fn log_level(console_output: bool, verbose: u8) -> log::LevelFilter {
    match verbose {
        0 if console_output => log::LevelFilter::Info,
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

/// The real start.
///
/// # Errors
/// Fatal errors that will cause the program to exit will be returned here.
pub fn start() -> Result<(), LooperError> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    setup_logger(log_level(config.console_output, cli.verbose))?;
    log::info!("Starting video looper.");
    shutdown::install_signal_handlers()?;

    let display = Arc::new(Display::new(
        config.colors,
        config.osd,
        config.ticker_path.clone(),
        config.screen.open(),
    ));
    let shutdown = Shutdown::new();
    let mut runner = Runner::new(
        Source::from_config(&config.source),
        Player::from_config(&config.player),
        display.clone(),
        Settings::from(&config),
        shutdown.clone(),
    )
    .with_overlays(config.overlays.iter().cloned().map(Overlay::new).collect());

    // Restores the terminal when dropped
    let keyboard = if config.keyboard_control {
        match Keyboard::spawn(shutdown) {
            Ok((keyboard, keys)) => {
                runner = runner.with_keys(keys);
                Some(keyboard)
            }
            Err(err) => {
                log::warn!("keyboard control disabled: {err}");
                None
            }
        }
    } else {
        None
    };

    smol::block_on(async {
        display.blank().await;
        runner.run().await;
    });
    drop(keyboard);
    Ok(())
}
