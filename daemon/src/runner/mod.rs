//! The runner drives the whole looper.
//!
//! Working cycle of a Runner:
//! 1. Build a [`Playlist`] from the media source and present it.
//! 2. Spawn the background tasks: clock, scrolling text, message listener.
//! 3. On every tick, start the next movie if the player is idle, rebuild the playlist if the
//!    source changed, and handle operator keys.
//!
//! Only the runner ever touches the player. A rebuild always stops the player first, and the new
//! playlist is only presented once completely built.

pub mod keyboard;
pub mod listener;
mod present;
pub mod shutdown;
pub mod tasks;

use smol::channel::Receiver;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backends::PlayerHandle;
use crate::config::{Cadence, Config};
use crate::display::Display;
use crate::overlay::Overlay;
use crate::playlist::Playlist;
use crate::runner::keyboard::Key;
use crate::runner::shutdown::Shutdown;
use crate::sources::MediaSource;
use crate::utils::{playlist, subprocess};

/// How long an old player may take to exit when the source changed.
pub const CHANGE_GRACE: Duration = Duration::from_secs(3);
/// How long the current player may take to exit when skipped.
pub const SKIP_GRACE: Duration = Duration::from_secs(1);
const COUNTDOWN_FRAME: Duration = Duration::from_secs(1);
/// How long to wait before starting the player again after it failed to start.
pub const PLAY_RETRY: Duration = Duration::from_secs(1);

/// A flag to break the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopFlag {
    Break,
    Continue,
}

/// The part of the configuration the runner needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub is_random: bool,
    pub keyboard_control: bool,
    pub countdown: u64,
    pub sound_vol_file: String,
    pub message_pipe: PathBuf,
    pub cadence: Cadence,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            is_random: config.is_random,
            keyboard_control: config.keyboard_control,
            countdown: config.countdown,
            sound_vol_file: config.player.sound_vol_file.clone(),
            message_pipe: config.message_pipe.clone(),
            cadence: config.cadence,
        }
    }
}

pub struct Runner<S: MediaSource, P: PlayerHandle> {
    source: S,
    player: P,
    playlist: Playlist,
    /// Last volume hint found on the source, passed to every `play`.
    volume: i32,
    /// Set after a failed start, nothing is played before then.
    retry_at: Option<Instant>,
    settings: Settings,
    display: Arc<Display>,
    shutdown: Shutdown,
    keys: Option<Receiver<Key>>,
    overlays: Vec<Overlay>,
}

impl<S: MediaSource, P: PlayerHandle> Runner<S, P> {
    pub fn new(
        source: S,
        player: P,
        display: Arc<Display>,
        settings: Settings,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            source,
            player,
            playlist: Playlist::default(),
            volume: 0,
            retry_at: None,
            settings,
            display,
            shutdown,
            keys: None,
            overlays: Vec::new(),
        }
    }

    /// Handles operator keys received through `keys`.
    #[must_use]
    pub fn with_keys(mut self, keys: Receiver<Key>) -> Self {
        self.keys = Some(keys);
        self
    }

    #[must_use]
    pub fn with_overlays(mut self, overlays: Vec<Overlay>) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    /// Scans the source for movies, remembering any volume hint found on the way.
    pub fn build_playlist(&mut self) -> Playlist {
        let scanned = playlist::build(
            &self.source.search_paths(),
            self.player.supported_extensions(),
            &self.settings.sound_vol_file,
            self.settings.is_random,
        );
        if let Some(volume) = scanned.volume {
            self.volume = volume;
        }
        scanned.playlist
    }

    /// Replaces the playlist with a fresh one and presents it.
    pub async fn load_playlist(&mut self) {
        self.playlist = self.build_playlist();
        self.retry_at = None;
        self.prepare_to_run().await;
    }

    /// Spawns the clock, scrolling text and message listener tasks.
    /// They are never joined, and exit on their own after shutdown.
    pub fn spawn_background(&self) {
        let cadence = self.settings.cadence;
        smol::spawn(tasks::clock(
            self.display.clone(),
            self.shutdown.clone(),
            cadence.clock,
        ))
        .detach();
        smol::spawn(tasks::scroll(
            self.display.clone(),
            self.shutdown.clone(),
            cadence.scroll,
        ))
        .detach();
        smol::spawn(listener::listen(
            self.settings.message_pipe.clone(),
            self.display.clone(),
            self.shutdown.clone(),
        ))
        .detach();
    }

    /// One iteration of the main loop.
    pub async fn tick(&mut self) -> LoopFlag {
        if shutdown::signalled() || self.shutdown.is_triggered() {
            return LoopFlag::Break;
        }

        let may_play = self.retry_at.is_none_or(|at| Instant::now() >= at);
        if may_play && !self.player.is_playing() {
            let looping = self.playlist.len() == 1;
            if let Some(movie) = self.playlist.get_next() {
                log::info!("Playing movie: {movie}");
                match self.player.play(movie, looping, self.volume) {
                    Ok(()) => self.retry_at = None,
                    Err(err) => {
                        log::error!("{err}, retrying in {}s", PLAY_RETRY.as_secs());
                        self.retry_at = Some(Instant::now() + PLAY_RETRY);
                    }
                }
            }
        }

        if self.source.is_changed() {
            log::info!("media source changed, rebuilding playlist");
            self.player.stop(Some(CHANGE_GRACE)).await;
            self.load_playlist().await;
        }

        let keys: Vec<Key> = match &self.keys {
            Some(rx) => std::iter::from_fn(|| rx.try_recv().ok()).collect(),
            None => Vec::new(),
        };
        for key in keys {
            match key {
                Key::Skip => self.player.stop(Some(SKIP_GRACE)).await,
                Key::Quit => return LoopFlag::Break,
                Key::PowerOff => {
                    let args = ["poweroff".to_string(), "-i".to_string()];
                    subprocess::fire_and_forget("systemctl", &args);
                }
                Key::Reboot => subprocess::fire_and_forget("reboot", &[]),
            }
        }

        LoopFlag::Continue
    }

    /// Shows the overlays, then runs until asked to quit.
    pub async fn run(&mut self) {
        for overlay in &mut self.overlays {
            if let Err(err) = overlay.display() {
                log::error!("overlay `{}`: {err}", overlay.name());
            }
        }
        self.load_playlist().await;
        self.spawn_background();

        while let LoopFlag::Continue = self.tick().await {
            smol::Timer::after(self.settings.cadence.tick).await;
        }
        self.quit().await;
    }

    /// Stops the player and the overlays, and tells the background tasks to exit.
    pub async fn quit(&mut self) {
        log::info!("shutting down");
        self.shutdown.trigger();
        self.player.stop(None).await;
        for overlay in &mut self.overlays {
            overlay.stop().await;
        }
    }
}
