use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::sources::MediaSource;

/// A playlist file listing one movie per line.
///
/// A change is reported when the modification time moves, and once whenever the file appears or
/// disappears.
pub struct PlaylistFileSource {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl PlaylistFileSource {
    pub fn new(path: PathBuf) -> Self {
        let modified = modified(&path);
        Self { path, modified }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path)
        .ok()
        .filter(fs::Metadata::is_file)
        .and_then(|meta| meta.modified().ok())
}

impl MediaSource for PlaylistFileSource {
    fn search_paths(&self) -> Vec<PathBuf> {
        vec![self.path.clone()]
    }

    fn is_changed(&mut self) -> bool {
        let current = modified(&self.path);
        if current == self.modified {
            return false;
        }
        self.modified = current;
        true
    }

    fn idle_message(&self) -> String {
        format!("No playlist found in {}", self.path.to_string_lossy())
    }
}
