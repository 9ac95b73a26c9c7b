//! Command line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version = "1.0.0",
    about = "Plays movies in a loop on an unattended display"
)]
pub struct Cli {
    #[arg(
        value_name = "CONFIG",
        default_value = "/boot/video_looper.ini",
        help = "Path to the configuration file."
    )]
    pub config: PathBuf,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Increase log verbosity, can be repeated."
    )]
    pub verbose: u8,
}
