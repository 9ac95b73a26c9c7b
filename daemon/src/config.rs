//! Loads the looper configuration from its ini document.
//!
//! The configuration is read once at startup and never changes afterwards.
//! Any missing or invalid required value aborts the startup.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::display::screen::{HeadlessScreen, Screen, TerminalScreen};
use crate::display::{Colors, Rgb};
use crate::utils::ParseError;
use crate::utils::ini::Ini;

const MAIN_SECTION: &str = "video_looper";
const OVERLAY_SECTION: &str = "overlay";

const DEFAULT_COUNTDOWN: u64 = 2;
const DEFAULT_TICKER_PATH: &str = "/run/shm/ticker.txt";
const DEFAULT_MESSAGE_PIPE: &str = "/run/shm/message_pipe";
const DEFAULT_EXTENSIONS: &str = "avi, mov, mkv, mp4, m4v";
const DEFAULT_VIEWER: &str = "pngview";
const DEFAULT_LAYER: i32 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {0}: {1}")]
    Unreadable(PathBuf, std::io::Error),
    #[error("malformed configuration: {0}")]
    Malformed(#[from] ParseError),
    #[error("missing `{key}` in section [{section}]")]
    MissingKey { section: String, key: String },
    #[error("invalid value `{value}` for `{key}` in section [{section}]")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Omxplayer,
    Mpv,
}

impl PlayerKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Omxplayer => "omxplayer",
            Self::Mpv => "mpv",
        }
    }
}

impl FromStr for PlayerKind {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "omxplayer" => Ok(Self::Omxplayer),
            "mpv" => Ok(Self::Mpv),
            _ => Err(ParseError::InvalidValue),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub kind: PlayerKind,
    /// Overrides the program name looked up in `$PATH`.
    pub binary: Option<String>,
    /// Lowercase, without the leading dot.
    pub extensions: Vec<String>,
    pub extra_args: Vec<String>,
    pub sound_vol_file: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Directory(PathBuf),
    PlaylistFile(PathBuf),
    Drive(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub name: String,
    pub path: PathBuf,
    pub x: i32,
    pub y: i32,
    pub layer: i32,
    pub viewer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Headless,
    Terminal,
}

impl ScreenKind {
    pub fn open(self) -> Box<dyn Screen> {
        match self {
            Self::Headless => Box::new(HeadlessScreen),
            Self::Terminal => Box::new(TerminalScreen::default()),
        }
    }
}

impl FromStr for ScreenKind {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "headless" => Ok(Self::Headless),
            "terminal" => Ok(Self::Terminal),
            _ => Err(ParseError::InvalidValue),
        }
    }
}

/// Periods of the recurring loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub clock: Duration,
    pub scroll: Duration,
    pub tick: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            clock: Duration::from_secs(1),
            scroll: Duration::from_millis(20),
            tick: Duration::from_millis(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub console_output: bool,
    pub osd: bool,
    pub is_random: bool,
    pub keyboard_control: bool,
    pub player: PlayerConfig,
    pub source: SourceConfig,
    pub colors: Colors,
    pub overlays: Vec<OverlayConfig>,
    /// Seconds of countdown before playback starts.
    pub countdown: u64,
    pub ticker_path: PathBuf,
    pub message_pipe: PathBuf,
    pub screen: ScreenKind,
    pub cadence: Cadence,
}

fn required<'a>(ini: &'a Ini, section: &str, key: &str) -> Result<&'a str, ConfigError> {
    ini.get(section, key).ok_or_else(|| ConfigError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    })
}

fn invalid(section: &str, key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn boolean(ini: &Ini, section: &str, key: &str) -> Result<bool, ConfigError> {
    let value = required(ini, section, key)?;
    parse_bool(value).ok_or_else(|| invalid(section, key, value))
}

fn value<T: FromStr>(ini: &Ini, section: &str, key: &str) -> Result<T, ConfigError> {
    let value = required(ini, section, key)?;
    value.parse().map_err(|_| invalid(section, key, value))
}

fn value_or<T: FromStr>(ini: &Ini, section: &str, key: &str, default: T) -> Result<T, ConfigError> {
    match ini.get(section, key) {
        Some(value) => value.parse().map_err(|_| invalid(section, key, value)),
        None => Ok(default),
    }
}

fn duration_or(
    ini: &Ini,
    section: &str,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match ini.get(section, key) {
        Some(value) => duration_str::parse(value).map_err(|_| invalid(section, key, value)),
        None => Ok(default),
    }
}

/// Splits a comma separated list, dropping empty items.
fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn load_player(ini: &Ini) -> Result<PlayerConfig, ConfigError> {
    let kind: PlayerKind = value(ini, MAIN_SECTION, "video_player")?;
    let section = kind.name();
    let extensions = list(ini.get(section, "extensions").unwrap_or(DEFAULT_EXTENSIONS))
        .into_iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect();
    let sound_vol_file = match ini.get(section, "sound_vol_file") {
        Some(value) => value.to_string(),
        None => required(ini, MAIN_SECTION, "sound_vol_file")?.to_string(),
    };
    Ok(PlayerConfig {
        kind,
        binary: ini.get(section, "binary").map(ToString::to_string),
        extensions,
        extra_args: ini
            .get(section, "extra_args")
            .map(|args| args.split_whitespace().map(ToString::to_string).collect())
            .unwrap_or_default(),
        sound_vol_file,
    })
}

fn load_source(ini: &Ini) -> Result<SourceConfig, ConfigError> {
    let reader = required(ini, MAIN_SECTION, "file_reader")?;
    match reader {
        "directory" => Ok(SourceConfig::Directory(PathBuf::from(required(
            ini,
            "directory",
            "path",
        )?))),
        "playlist" => Ok(SourceConfig::PlaylistFile(PathBuf::from(required(
            ini, "playlist", "path",
        )?))),
        "usb_drive" => Ok(SourceConfig::Drive(PathBuf::from(required(
            ini,
            "usb_drive",
            "mount_path",
        )?))),
        other => Err(invalid(MAIN_SECTION, "file_reader", other)),
    }
}

fn load_overlays(ini: &Ini) -> Result<Vec<OverlayConfig>, ConfigError> {
    let viewer = ini
        .get(OVERLAY_SECTION, "viewer")
        .unwrap_or(DEFAULT_VIEWER)
        .to_string();
    let layer = value_or(ini, OVERLAY_SECTION, "layer", DEFAULT_LAYER)?;
    list(ini.get(MAIN_SECTION, "overlays").unwrap_or_default())
        .into_iter()
        .map(|name| {
            Ok(OverlayConfig {
                path: PathBuf::from(required(ini, &name, "path")?),
                x: value(ini, &name, "x")?,
                y: value(ini, &name, "y")?,
                layer,
                viewer: viewer.clone(),
                name,
            })
        })
        .collect()
}

impl Config {
    /// Reads and parses the configuration file.
    ///
    /// # Errors
    /// See [`ConfigError`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Unreadable(path.to_path_buf(), err))?;
        Self::from_ini(&Ini::parse(&content)?)
    }

    /// Builds the configuration from a parsed document.
    ///
    /// # Errors
    /// See [`ConfigError`].
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let defaults = Cadence::default();
        Ok(Self {
            console_output: boolean(ini, MAIN_SECTION, "console_output")?,
            osd: boolean(ini, MAIN_SECTION, "osd")?,
            is_random: boolean(ini, MAIN_SECTION, "is_random")?,
            keyboard_control: boolean(ini, MAIN_SECTION, "keyboard_control")?,
            player: load_player(ini)?,
            source: load_source(ini)?,
            colors: Colors {
                bg: value::<Rgb>(ini, MAIN_SECTION, "bgcolor")?,
                fg: value::<Rgb>(ini, MAIN_SECTION, "fgcolor")?,
                bot_bg: value::<Rgb>(ini, MAIN_SECTION, "botbgcolor")?,
                bot_fg: value::<Rgb>(ini, MAIN_SECTION, "botfgcolor")?,
            },
            overlays: load_overlays(ini)?,
            countdown: value_or(ini, MAIN_SECTION, "countdown_time", DEFAULT_COUNTDOWN)?,
            ticker_path: value_or(
                ini,
                MAIN_SECTION,
                "ticker_path",
                PathBuf::from(DEFAULT_TICKER_PATH),
            )?,
            message_pipe: value_or(
                ini,
                MAIN_SECTION,
                "message_pipe",
                PathBuf::from(DEFAULT_MESSAGE_PIPE),
            )?,
            screen: value_or(ini, MAIN_SECTION, "screen", ScreenKind::Headless)?,
            cadence: Cadence {
                clock: duration_or(ini, MAIN_SECTION, "clock_interval", defaults.clock)?,
                scroll: duration_or(ini, MAIN_SECTION, "scroll_interval", defaults.scroll)?,
                tick: duration_or(ini, MAIN_SECTION, "tick_interval", defaults.tick)?,
            },
        })
    }
}
