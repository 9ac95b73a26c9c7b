//! cli parameters

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    version = "1.0.0",
    about = "CLI tool for talking to a running looperd.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

fn parse_duration(arg: &str) -> Result<Duration, String> {
    duration_str::parse(arg).map_err(|err| err.to_string())
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show a message in the text band")]
    Message {
        #[arg(long, default_value = "/run/shm/message_pipe", help = "The message pipe")]
        pipe: PathBuf,
        #[arg(
            short,
            long,
            default_value = "5s",
            value_parser = parse_duration,
            help = "How long the message stays on screen"
        )]
        duration: Duration,
        #[arg(short, long, default_value = "error", help = "Kind of the message")]
        kind: String,
        content: String,
    },
    #[command(about = "Replace the ticker text")]
    Ticker {
        #[arg(long, default_value = "/run/shm/ticker.txt", help = "The ticker file")]
        path: PathBuf,
        #[arg(required = true)]
        lines: Vec<String>,
    },
}
