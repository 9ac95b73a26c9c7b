//! Operator keys read from the controlling terminal.
//!
//! While active, the terminal is switched to non-canonical mode without echo, so single key
//! presses arrive immediately. The previous mode is restored on drop.

use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
use smol::channel::Receiver;
use smol::io::AsyncReadExt;
use std::io::IsTerminal;
use thiserror::Error;

use crate::runner::shutdown::Shutdown;

const ESCAPE: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Stop the current movie so the next one starts.
    Skip,
    Quit,
    PowerOff,
    Reboot,
}

impl Key {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'n' | b'N' => Some(Self::Skip),
            b'p' | b'P' => Some(Self::PowerOff),
            b'r' | b'R' => Some(Self::Reboot),
            _ => None,
        }
    }
}

/// Maps the bytes of one terminal read to keys.
///
/// Only a lone Esc quits. Escape sequences sent by arrow, function and Alt-modified keys start
/// with the same byte and are skipped whole. A terminal writes each sequence at once, so a
/// sequence is never split across reads in practice.
pub fn decode(bytes: &[u8]) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut rest = bytes;
    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != ESCAPE {
            keys.extend(Key::from_byte(byte));
            continue;
        }
        match rest.split_first() {
            None | Some((&ESCAPE, _)) => keys.push(Key::Quit),
            // CSI: parameter bytes up to a final byte in 0x40..=0x7e
            Some((b'[', tail)) => {
                let end = tail
                    .iter()
                    .position(|b| (0x40..=0x7e).contains(b))
                    .map_or(tail.len(), |pos| pos + 1);
                rest = &tail[end..];
            }
            // SS3 (`ESC O P` for F1) carries one more byte, Alt+key carries none
            Some((b'O', tail)) => rest = tail.get(1..).unwrap_or_default(),
            Some((_, tail)) => rest = tail,
        }
    }
    keys
}

#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("standard input is not a terminal")]
    NotATerminal,
    #[error("cannot configure terminal: {0}")]
    Termios(#[from] nix::Error),
}

pub struct Keyboard {
    saved: Termios,
}

impl Keyboard {
    /// Configures the terminal and spawns the reader task.
    /// Keys are delivered through the returned [`Receiver`].
    ///
    /// # Errors
    /// See [`KeyboardError`].
    pub fn spawn(shutdown: Shutdown) -> Result<(Self, Receiver<Key>), KeyboardError> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return Err(KeyboardError::NotATerminal);
        }
        let saved = termios::tcgetattr(&stdin)?;
        let mut raw = saved.clone();
        raw.local_flags.remove(LocalFlags::ICANON | LocalFlags::ECHO);
        termios::tcsetattr(&stdin, SetArg::TCSANOW, &raw)?;

        let (tx, rx) = smol::channel::unbounded();
        smol::spawn(async move {
            let mut input = smol::Unblock::new(std::io::stdin());
            let mut buffer = [0_u8; 64];
            'read: loop {
                let read = smol::future::race(
                    async { Some(input.read(&mut buffer).await) },
                    async {
                        shutdown.wait().await;
                        None
                    },
                )
                .await;
                match read {
                    Some(Ok(0)) | None => break,
                    Some(Ok(len)) => {
                        for key in decode(&buffer[..len]) {
                            if tx.send(key).await.is_err() {
                                break 'read;
                            }
                        }
                    }
                    Some(Err(err)) => {
                        log::warn!("failed to read keyboard: {err}");
                        break;
                    }
                }
            }
            log::debug!("keyboard reader exited");
        })
        .detach();

        Ok((Self { saved }, rx))
    }
}

impl Drop for Keyboard {
    fn drop(&mut self) {
        if let Err(err) = termios::tcsetattr(std::io::stdin(), SetArg::TCSANOW, &self.saved) {
            log::warn!("cannot restore terminal: {err}");
        }
    }
}
