//! Listens on the message pipe and shows received errors in the scrolling band.
//!
//! The pipe is a FIFO created if absent. It is opened for both reading and writing so the reader
//! never sees end-of-file while no writer is connected.

use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use smol::Async;
use smol::io::AsyncReadExt;
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::display::Display;
use crate::runner::shutdown::Shutdown;
use crate::utils::message::{self, Message};

/// Pause before reading again after an empty or failed read.
const RETRY_DELAY: Duration = Duration::from_millis(500);
const BUFFER_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("cannot create pipe {0}: {1}")]
    CannotCreate(PathBuf, nix::Error),
    #[error("{0} exists but is not a pipe")]
    NotAPipe(PathBuf),
    #[error("cannot open pipe {0}: {1}")]
    CannotOpen(PathBuf, std::io::Error),
}

/// Creates the pipe if needed and opens it.
///
/// # Errors
/// See [`ListenerError`].
pub fn open_pipe(path: &Path) -> Result<Async<File>, ListenerError> {
    match fs::metadata(path) {
        Ok(meta) if !meta.file_type().is_fifo() => {
            return Err(ListenerError::NotAPipe(path.to_path_buf()));
        }
        Ok(_) => (),
        Err(_) => {
            mkfifo(path, Mode::from_bits_truncate(0o666))
                .map_err(|err| ListenerError::CannotCreate(path.to_path_buf(), err))?;
            // Not fatal, writers running as the same user still work
            if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o666)) {
                log::warn!("cannot open up permissions of {}: {err}", path.to_string_lossy());
            }
        }
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|err| ListenerError::CannotOpen(path.to_path_buf(), err))?;
    Async::new(file).map_err(|err| ListenerError::CannotOpen(path.to_path_buf(), err))
}

/// Shows one message: errors switch the band to error mode for the requested time.
/// The band goes back to the ticker afterwards in any case.
pub async fn show_message(display: &Display, shutdown: &Shutdown, message: Message) {
    log::info!(
        "time elapse: {}, message_type: {}, content: {}",
        message.time_elapse,
        message.message_type,
        message.content
    );
    let duration = message.display_duration();
    if message.is_error() {
        display.text().await.show_error(message.content);
    }
    shutdown.sleep(duration).await;
    display.text().await.show_ticker();
}

/// The listener task.
pub async fn listen(path: PathBuf, display: Arc<Display>, shutdown: Shutdown) {
    let mut pipe = match open_pipe(&path) {
        Ok(pipe) => pipe,
        Err(err) => {
            log::error!("message listener disabled: {err}");
            return;
        }
    };
    let mut buffer = vec![0_u8; BUFFER_SIZE];

    loop {
        let read = smol::future::race(
            async { Some(pipe.read(&mut buffer).await) },
            async {
                shutdown.wait().await;
                None
            },
        )
        .await;

        match read {
            None => break,
            Some(Ok(0)) => {
                if !shutdown.sleep(RETRY_DELAY).await {
                    break;
                }
            }
            Some(Ok(len)) => {
                log::debug!("received: '{}'", String::from_utf8_lossy(&buffer[..len]));
                for decoded in message::decode(&buffer[..len]) {
                    match decoded {
                        Ok(message) => show_message(&display, &shutdown, message).await,
                        Err(err) => log::warn!("dropping message: {err}"),
                    }
                }
            }
            Some(Err(err)) => {
                log::warn!("failed to read {}: {err}", path.to_string_lossy());
                if !shutdown.sleep(RETRY_DELAY).await {
                    break;
                }
            }
        }
    }
    log::debug!("message listener exited");
}
