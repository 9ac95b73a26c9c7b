//! The boundary to the actual rendering backend.
//!
//! Tasks never draw directly: they hand a whole frame for one [`Region`] to the [`Screen`] while
//! holding the screen lock, so a frame is never pushed half-built.

use std::io::Write;
use thiserror::Error;

use crate::display::Rgb;
use crate::display::scroll::{self, BAND_LENGTH, GLYPH_ADVANCE};

/// Areas of the screen owned by different writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The main area, used for the countdown and the idle message.
    Main,
    /// The whole bottom strip, only filled when blanking.
    Bottom,
    /// The clock corner of the bottom strip.
    Clock,
    /// The scrolling band of the bottom strip.
    Ticker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Big,
}

/// A single rendering instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Fill(Rgb),
    /// Text centred in the region, `line` lines below the centre.
    Text {
        text: String,
        size: FontSize,
        line: i32,
        fg: Rgb,
        bg: Rgb,
    },
    /// One copy of the scrolling label at `offset` along the band.
    Label {
        text: String,
        offset: i32,
        fg: Rgb,
        bg: Rgb,
    },
}

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendering backend.
pub trait Screen: Send {
    /// Pushes a complete frame for one region.
    ///
    /// # Errors
    /// A failing frame is skipped by the caller.
    fn present(&mut self, region: Region, frame: &[Draw]) -> Result<(), ScreenError>;
}

/// Renders nothing, frames are only traced.
#[derive(Default)]
pub struct HeadlessScreen;

impl Screen for HeadlessScreen {
    fn present(&mut self, region: Region, frame: &[Draw]) -> Result<(), ScreenError> {
        log::trace!("{region:?}: {frame:?}");
        Ok(())
    }
}

/// Renders the bottom strip as a single status line on the controlling terminal.
#[derive(Default)]
pub struct TerminalScreen {
    clock: String,
    band: String,
    colors: Option<(Rgb, Rgb)>,
}

fn ansi(fg: Rgb, bg: Rgb) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
        fg.0, fg.1, fg.2, bg.0, bg.1, bg.2
    )
}

impl TerminalScreen {
    fn status_line(&self) -> String {
        let color = self.colors.map(|(fg, bg)| ansi(fg, bg)).unwrap_or_default();
        format!("\r\x1b[2K{color}[{}] {}\x1b[0m", self.clock, self.band)
    }
}

impl Screen for TerminalScreen {
    fn present(&mut self, region: Region, frame: &[Draw]) -> Result<(), ScreenError> {
        let mut out = std::io::stdout().lock();
        match region {
            Region::Clock => {
                for draw in frame {
                    if let Draw::Text { text, .. } = draw {
                        text.clone_into(&mut self.clock);
                    }
                }
            }
            Region::Ticker => {
                let mut offsets = Vec::new();
                let mut label = "";
                for draw in frame {
                    if let Draw::Label {
                        text,
                        offset,
                        fg,
                        bg,
                    } = draw
                    {
                        label = text.as_str();
                        offsets.push(*offset);
                        self.colors = Some((*fg, *bg));
                    }
                }
                let columns = usize::try_from(BAND_LENGTH / GLYPH_ADVANCE).unwrap_or_default();
                self.band = scroll::visible(label, &offsets, columns);
            }
            Region::Main | Region::Bottom => {
                for draw in frame {
                    if let Draw::Text { text, fg, bg, .. } = draw {
                        writeln!(out, "\r\x1b[2K{}{text}\x1b[0m", ansi(*fg, *bg))?;
                    }
                }
            }
        }
        write!(out, "{}", self.status_line())?;
        out.flush()?;
        Ok(())
    }
}
