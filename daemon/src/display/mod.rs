//! Shared on-screen state.
//!
//! The clock region and the text region are guarded separately: the clock task only ever touches
//! the former, the scrolling task and the message listener only the latter.
//! Every frame is pushed while holding the screen lock.

pub mod screen;
pub mod scroll;

use smol::lock::{Mutex, MutexGuard};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use crate::display::screen::{Draw, FontSize, Region, Screen};
use crate::utils::ParseError;

/// Appended to every ticker line.
pub const TICKER_SEPARATOR: &str = "    -    ";
/// Color of the scrolling text while an error is shown.
pub const ERROR_COLOR: Rgb = Rgb(255, 3, 58);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = ParseError;

    /// Parses `"255, 255, 255"`. Commas and whitespace both separate channels.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let channels = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>().map_err(|_| ParseError::InvalidValue))
            .collect::<Result<Vec<u8>, ParseError>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Self(*r, *g, *b)),
            [_, _, _, ..] => Err(ParseError::InvalidValue),
            _ => Err(ParseError::NotEnoughComponents),
        }
    }
}

/// Colors of the main area and of the bottom strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub bg: Rgb,
    pub fg: Rgb,
    pub bot_bg: Rgb,
    pub bot_fg: Rgb,
}

/// What the scrolling band shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Ticker,
    Error,
}

/// State of the scrolling text region.
pub struct TextState {
    mode: TextMode,
    ticker_path: PathBuf,
    ticker_modified: Option<SystemTime>,
    ticker_text: String,
    error_content: String,
    rendered: String,
}

/// Reads the ticker file into one line of text.
/// A missing or unreadable file yields an empty text.
fn read_ticker(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(|line| format!("{}{TICKER_SEPARATOR}", line.trim()))
            .collect(),
        Err(_) => String::new(),
    }
}

impl TextState {
    pub fn new(ticker_path: PathBuf) -> Self {
        let mut state = Self {
            mode: TextMode::Ticker,
            ticker_path,
            ticker_modified: None,
            ticker_text: String::new(),
            error_content: String::new(),
            rendered: String::new(),
        };
        state.refresh_ticker();
        state
    }

    /// Reloads the ticker text if the file's modification time advanced, or if the file vanished.
    /// A file rewritten with an older modification time is not picked up.
    /// Returns whether it reloaded.
    fn refresh_ticker(&mut self) -> bool {
        let modified = fs::metadata(&self.ticker_path)
            .and_then(|meta| meta.modified())
            .ok();
        let advanced = modified > self.ticker_modified;
        let vanished = modified.is_none() && self.ticker_modified.is_some();
        if !advanced && !vanished {
            return false;
        }
        self.ticker_modified = modified;
        self.ticker_text = read_ticker(&self.ticker_path);
        true
    }

    /// Whether the scrolling label must be re-rendered.
    ///
    /// Only stats the ticker file unless its modification time changed.
    pub fn should_update(&mut self) -> bool {
        match self.mode {
            TextMode::Ticker => {
                let changed = self.refresh_ticker();
                changed || self.ticker_text != self.rendered
            }
            TextMode::Error => self.error_content != self.rendered,
        }
    }

    /// Marks the current content as rendered and returns it with the mode it belongs to.
    pub fn render(&mut self) -> (String, TextMode) {
        self.rendered = match self.mode {
            TextMode::Ticker => self.ticker_text.clone(),
            TextMode::Error => self.error_content.clone(),
        };
        (self.rendered.clone(), self.mode)
    }

    pub fn show_error(&mut self, content: String) {
        self.error_content = content;
        self.mode = TextMode::Error;
    }

    pub fn show_ticker(&mut self) {
        self.mode = TextMode::Ticker;
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn error_content(&self) -> &str {
        &self.error_content
    }

}

/// The shared display, handed to every task behind an [`std::sync::Arc`].
pub struct Display {
    colors: Colors,
    osd: bool,
    text: Mutex<TextState>,
    clock: Mutex<String>,
    screen: Mutex<Box<dyn Screen>>,
}

impl Display {
    pub fn new(colors: Colors, osd: bool, ticker_path: PathBuf, screen: Box<dyn Screen>) -> Self {
        Self {
            colors,
            osd,
            text: Mutex::new(TextState::new(ticker_path)),
            clock: Mutex::new(String::new()),
            screen: Mutex::new(screen),
        }
    }

    pub fn osd(&self) -> bool {
        self.osd
    }

    /// Locks the text region.
    pub async fn text(&self) -> MutexGuard<'_, TextState> {
        self.text.lock().await
    }

    /// The clock text last drawn.
    pub async fn clock(&self) -> String {
        self.clock.lock().await.clone()
    }

    /// Pushes a frame, unless the on-screen display is disabled.
    /// A failing frame is logged and skipped.
    pub async fn present(&self, region: Region, frame: &[Draw]) {
        if !self.osd {
            return;
        }
        let mut screen = self.screen.lock().await;
        if let Err(err) = screen.present(region, frame) {
            log::warn!("skipping frame for {region:?}: {err}");
        }
    }

    /// Fills the main area and the bottom strip with their background colors.
    pub async fn blank(&self) {
        self.present(Region::Main, &[Draw::Fill(self.colors.bg)])
            .await;
        self.present(Region::Bottom, &[Draw::Fill(self.colors.bot_bg)])
            .await;
    }

    pub async fn show_clock(&self, text: &str) {
        let mut clock = self.clock.lock().await;
        text.clone_into(&mut *clock);
        self.present(
            Region::Clock,
            &[
                Draw::Fill(self.colors.bot_bg),
                Draw::Text {
                    text: text.to_string(),
                    size: FontSize::Small,
                    line: 0,
                    fg: self.colors.bot_fg,
                    bg: self.colors.bot_bg,
                },
            ],
        )
        .await;
    }

    /// Draws both copies of the scrolling label.
    pub async fn show_label(&self, label: &str, mode: TextMode, offsets: [i32; 2]) {
        let fg = match mode {
            TextMode::Ticker => self.colors.bot_fg,
            TextMode::Error => ERROR_COLOR,
        };
        let mut frame = vec![Draw::Fill(self.colors.bot_bg)];
        frame.extend(offsets.iter().map(|&offset| Draw::Label {
            text: label.to_string(),
            offset,
            fg,
            bg: self.colors.bot_bg,
        }));
        self.present(Region::Ticker, &frame).await;
    }

    /// Draws the static countdown line with the shrinking numeral next to it.
    pub async fn show_countdown(&self, message: &str, remaining: u64) {
        self.present(
            Region::Main,
            &[
                Draw::Text {
                    text: message.to_string(),
                    size: FontSize::Small,
                    line: -1,
                    fg: self.colors.fg,
                    bg: self.colors.bg,
                },
                Draw::Text {
                    text: remaining.to_string(),
                    size: FontSize::Big,
                    line: 0,
                    fg: self.colors.fg,
                    bg: self.colors.bg,
                },
            ],
        )
        .await;
    }

    /// Clears the main area and leaves the idle message on it.
    pub async fn show_idle(&self, message: &str, hint: Option<&str>) {
        let mut frame = vec![
            Draw::Fill(self.colors.bg),
            Draw::Text {
                text: message.to_string(),
                size: FontSize::Small,
                line: 0,
                fg: self.colors.fg,
                bg: self.colors.bg,
            },
        ];
        if let Some(hint) = hint {
            frame.push(Draw::Text {
                text: hint.to_string(),
                size: FontSize::Small,
                line: 1,
                fg: self.colors.fg,
                bg: self.colors.bg,
            });
        }
        self.present(Region::Main, &frame).await;
    }
}
