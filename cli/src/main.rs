//! `looperctl` entry
//!
//! The cli program to communicate with looperd

mod cli;

use clap::Parser;
use looperd::utils::message::{Message, MessageError};
use nix::fcntl::OFlag;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::{Cli, Commands};

#[derive(Debug, Error)]
enum CtlError {
    #[error("cannot open {0}, is looperd running? ({1})")]
    CannotOpen(PathBuf, io::Error),
    #[error("cannot write {0}: {1}")]
    CannotWrite(PathBuf, io::Error),
    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Writes one record to the pipe.
/// Opening is non-blocking so a missing reader fails instead of hanging.
fn send(pipe: &Path, message: &Message) -> Result<(), CtlError> {
    let bytes = message.encode()?;
    let mut file = OpenOptions::new()
        .write(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(pipe)
        .map_err(|err| CtlError::CannotOpen(pipe.to_path_buf(), err))?;
    file.write_all(&bytes)
        .map_err(|err| CtlError::CannotWrite(pipe.to_path_buf(), err))
}

/// Replaces the ticker file through a rename, so the daemon never reads half of it.
fn write_ticker(path: &Path, lines: &[String]) -> Result<(), CtlError> {
    let staging = path.with_extension("new");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&staging, content).map_err(|err| CtlError::CannotWrite(staging.clone(), err))?;
    fs::rename(&staging, path).map_err(|err| CtlError::CannotWrite(path.to_path_buf(), err))
}

fn run(cli: Cli) -> Result<(), CtlError> {
    match cli.command {
        Commands::Message {
            pipe,
            duration,
            kind,
            content,
        } => send(&pipe, &Message::new(duration, &kind, &content)),
        Commands::Ticker { path, lines } => write_ticker(&path, &lines),
    }
}

fn main() -> Result<(), CtlError> {
    run(Cli::parse()).inspect_err(|err| eprintln!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn replace_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticker.txt");
        fs::write(&path, "old\n").unwrap();
        write_ticker(&path, &["first".to_string(), "second".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        assert!(!path.with_extension("new").exists());
    }

    #[test]
    fn send_without_reader() {
        let dir = tempfile::tempdir().unwrap();
        let pipe = dir.path().join("message_pipe");
        nix::unistd::mkfifo(&pipe, nix::sys::stat::Mode::from_bits_truncate(0o600)).unwrap();
        let message = Message::new(Duration::from_secs(1), "error", "disk full");
        assert!(matches!(send(&pipe, &message), Err(CtlError::CannotOpen(..))));
    }
}
