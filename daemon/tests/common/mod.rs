//! Do some preparations for integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, Once, RwLock};
use std::time::Duration;

use looperd::backends::PlayerHandle;
use looperd::config::Cadence;
use looperd::display::screen::{Draw, Region, Screen, ScreenError};
use looperd::display::{Colors, Display, Rgb};
use looperd::runner::Settings;
use looperd::sources::MediaSource;
use looperd::utils::subprocess::SubprocessError;

pub static CAPTURED: LazyLock<Arc<RwLock<String>>> =
    LazyLock::new(|| Arc::new(RwLock::new(String::new())));
static INIT: Once = Once::new();

struct Capturer {
    content: Arc<RwLock<String>>,
}
impl std::io::Write for Capturer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut locked = self.content.write().unwrap();
        let got = std::str::from_utf8(buf).unwrap();
        locked.push_str(got);
        Ok(got.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn setup() {
    INIT.call_once(|| {
        let cap = Capturer {
            content: CAPTURED.clone(),
        };
        env_logger::builder()
            .is_test(true)
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(cap)))
            .init();
    });
}

pub fn captured() -> String {
    CAPTURED.read().expect("Cannot read captured log").clone()
}

/// Creates empty files named `names` in `dir`.
pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"").expect("Cannot create test file");
    }
}

pub fn settings(pipe: PathBuf) -> Settings {
    Settings {
        is_random: false,
        keyboard_control: true,
        countdown: 0,
        sound_vol_file: "sound_volume".to_string(),
        message_pipe: pipe,
        cadence: Cadence {
            clock: Duration::from_millis(50),
            scroll: Duration::from_millis(5),
            tick: Duration::from_millis(5),
        },
    }
}

pub fn colors() -> Colors {
    Colors {
        bg: Rgb(0, 0, 0),
        fg: Rgb(255, 255, 255),
        bot_bg: Rgb(0, 0, 0),
        bot_fg: Rgb(255, 255, 255),
    }
}

pub type Frames = Arc<Mutex<Vec<(Region, Vec<Draw>)>>>;

/// Keeps every frame it is given.
#[derive(Default)]
pub struct RecordingScreen {
    pub frames: Frames,
}

impl Screen for RecordingScreen {
    fn present(&mut self, region: Region, frame: &[Draw]) -> Result<(), ScreenError> {
        self.frames.lock().unwrap().push((region, frame.to_vec()));
        Ok(())
    }
}

/// A display drawing into a [`RecordingScreen`], with the ticker read from `ticker`.
pub fn display(ticker: PathBuf) -> (Arc<Display>, Frames) {
    display_with_osd(ticker, true)
}

pub fn display_with_osd(ticker: PathBuf, osd: bool) -> (Arc<Display>, Frames) {
    let screen = RecordingScreen::default();
    let frames = screen.frames.clone();
    let display = Display::new(colors(), osd, ticker, Box::new(screen));
    (Arc::new(display), frames)
}

/// Every text drawn in `region`.
pub fn texts(frames: &Frames, region: Region) -> Vec<String> {
    frames
        .lock()
        .unwrap()
        .iter()
        .filter(|(r, _)| *r == region)
        .flat_map(|(_, frame)| frame.clone())
        .filter_map(|draw| match draw {
            Draw::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

/// A source with scripted changes.
pub struct FakeSource {
    pub paths: Vec<PathBuf>,
    pub changes: VecDeque<bool>,
    pub scans: Cell<usize>,
    pub message: String,
}

impl FakeSource {
    pub fn new(paths: Vec<PathBuf>, changes: &[bool]) -> Self {
        Self {
            paths,
            changes: changes.iter().copied().collect(),
            scans: Cell::new(0),
            message: "Insert USB drive with compatible movies.".to_string(),
        }
    }
}

impl MediaSource for FakeSource {
    fn search_paths(&self) -> Vec<PathBuf> {
        self.scans.set(self.scans.get() + 1);
        self.paths.clone()
    }

    fn is_changed(&mut self) -> bool {
        self.changes.pop_front().unwrap_or(false)
    }

    fn idle_message(&self) -> String {
        self.message.clone()
    }
}

/// A player recording what it was asked to do.
/// An instant player finishes every movie as soon as it starts, a broken one never starts.
pub struct FakePlayer {
    pub extensions: Vec<String>,
    pub instant: bool,
    pub broken: bool,
    pub playing: bool,
    pub plays: Vec<(String, bool, i32)>,
    pub stops: Vec<Option<Duration>>,
}

impl FakePlayer {
    pub fn new(instant: bool) -> Self {
        Self {
            extensions: vec!["mp4".to_string(), "mkv".to_string()],
            instant,
            broken: false,
            playing: false,
            plays: Vec::new(),
            stops: Vec::new(),
        }
    }
}

impl PlayerHandle for FakePlayer {
    fn supported_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn is_playing(&mut self) -> bool {
        self.playing && !self.instant
    }

    fn play(&mut self, item: &str, looping: bool, volume: i32) -> Result<(), SubprocessError> {
        self.plays.push((item.to_string(), looping, volume));
        if self.broken {
            return Err(SubprocessError::CannotSpawn(
                "fake".to_string(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        self.playing = true;
        Ok(())
    }

    async fn stop(&mut self, grace: Option<Duration>) {
        self.stops.push(grace);
        self.playing = false;
    }
}
