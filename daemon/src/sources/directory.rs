use std::path::PathBuf;

use crate::sources::MediaSource;

/// A single directory on disk. It is never reported as changed.
pub struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl MediaSource for DirectorySource {
    fn search_paths(&self) -> Vec<PathBuf> {
        vec![self.path.clone()]
    }

    fn is_changed(&mut self) -> bool {
        false
    }

    fn idle_message(&self) -> String {
        format!("No movies found in {}", self.path.to_string_lossy())
    }
}
