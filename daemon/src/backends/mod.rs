//! Video player backends.
//!
//! Every backend is an external program. A [`Backend`] only knows how to build the command line,
//! [`ExternalPlayer`] supervises the resulting process.

mod mpv;
mod omxplayer;

pub use mpv::Mpv;
pub use omxplayer::Omxplayer;

use std::future::Future;
use std::time::Duration;

use crate::config::{PlayerConfig, PlayerKind};
use crate::utils::subprocess::{Supervised, SubprocessError, quiet_command};

/// General trait of a player.
pub trait PlayerHandle {
    /// Lowercase extensions, without the leading dot.
    fn supported_extensions(&self) -> &[String];
    fn is_playing(&mut self) -> bool;
    /// Starts playing `item`, replacing whatever was playing.
    ///
    /// # Errors
    /// Returns a [`SubprocessError`] if the player cannot be started.
    fn play(&mut self, item: &str, looping: bool, volume: i32) -> Result<(), SubprocessError>;
    /// Stops playback. With a grace period, waits at most that long for the player to exit before
    /// killing it; without one, only asks it to exit.
    fn stop(&mut self, grace: Option<Duration>) -> impl Future<Output = ()> + Send;
}

/// General trait of a backend.
pub trait Backend {
    fn get_name() -> &'static str;
    /// Arguments to play `item`.
    fn get_args(&self, item: &str, looping: bool, volume: i32) -> Vec<String>;
}

pub struct ExternalPlayer<B: Backend> {
    backend: B,
    binary: String,
    extensions: Vec<String>,
    current: Option<Supervised>,
}

impl<B: Backend> ExternalPlayer<B> {
    pub fn new(backend: B, config: &PlayerConfig) -> Self {
        Self {
            backend,
            binary: config
                .binary
                .clone()
                .unwrap_or_else(|| B::get_name().to_string()),
            extensions: config.extensions.clone(),
            current: None,
        }
    }
}

impl<B: Backend + Send> PlayerHandle for ExternalPlayer<B> {
    fn supported_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn is_playing(&mut self) -> bool {
        self.current.as_mut().is_some_and(Supervised::is_alive)
    }

    fn play(&mut self, item: &str, looping: bool, volume: i32) -> Result<(), SubprocessError> {
        if let Some(previous) = self.current.take() {
            previous.interrupt();
        }
        let args = self.backend.get_args(item, looping, volume);
        let mut cmd = quiet_command(&self.binary, &args);
        self.current = Some(Supervised::spawn(B::get_name(), &mut cmd)?);
        Ok(())
    }

    async fn stop(&mut self, grace: Option<Duration>) {
        let Some(current) = self.current.take() else {
            return;
        };
        match grace {
            Some(grace) => current.terminate(grace).await,
            None => current.interrupt(),
        }
    }
}

/// The configured player.
pub enum Player {
    Omxplayer(ExternalPlayer<Omxplayer>),
    Mpv(ExternalPlayer<Mpv>),
}

impl Player {
    pub fn from_config(config: &PlayerConfig) -> Self {
        match config.kind {
            PlayerKind::Omxplayer => Self::Omxplayer(ExternalPlayer::new(
                Omxplayer::new(config.extra_args.clone()),
                config,
            )),
            PlayerKind::Mpv => {
                Self::Mpv(ExternalPlayer::new(Mpv::new(config.extra_args.clone()), config))
            }
        }
    }
}

impl PlayerHandle for Player {
    fn supported_extensions(&self) -> &[String] {
        match self {
            Self::Omxplayer(player) => player.supported_extensions(),
            Self::Mpv(player) => player.supported_extensions(),
        }
    }

    fn is_playing(&mut self) -> bool {
        match self {
            Self::Omxplayer(player) => player.is_playing(),
            Self::Mpv(player) => player.is_playing(),
        }
    }

    fn play(&mut self, item: &str, looping: bool, volume: i32) -> Result<(), SubprocessError> {
        match self {
            Self::Omxplayer(player) => player.play(item, looping, volume),
            Self::Mpv(player) => player.play(item, looping, volume),
        }
    }

    async fn stop(&mut self, grace: Option<Duration>) {
        match self {
            Self::Omxplayer(player) => player.stop(grace).await,
            Self::Mpv(player) => player.stop(grace).await,
        }
    }
}
