//! Media sources: where movies are looked for, and whether that place changed.

mod directory;
mod drive;
mod playlist_file;

pub use directory::DirectorySource;
pub use drive::DriveSource;
pub use playlist_file::PlaylistFileSource;

use std::path::PathBuf;

use crate::config::SourceConfig;

/// General trait of a media source.
pub trait MediaSource {
    /// Paths to search for movies. If the first one is a file, it is read as a playlist file.
    fn search_paths(&self) -> Vec<PathBuf>;
    /// Whether the backing store changed since the last call.
    /// Polled on every tick of the main loop, so it must stay cheap.
    fn is_changed(&mut self) -> bool;
    /// Shown when no movie can be found.
    fn idle_message(&self) -> String;
}

/// The configured source.
pub enum Source {
    Directory(DirectorySource),
    PlaylistFile(PlaylistFileSource),
    Drive(DriveSource),
}

impl Source {
    pub fn from_config(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::Directory(path) => Self::Directory(DirectorySource::new(path.clone())),
            SourceConfig::PlaylistFile(path) => {
                Self::PlaylistFile(PlaylistFileSource::new(path.clone()))
            }
            SourceConfig::Drive(path) => Self::Drive(DriveSource::new(path.clone())),
        }
    }
}

impl MediaSource for Source {
    fn search_paths(&self) -> Vec<PathBuf> {
        match self {
            Self::Directory(source) => source.search_paths(),
            Self::PlaylistFile(source) => source.search_paths(),
            Self::Drive(source) => source.search_paths(),
        }
    }

    fn is_changed(&mut self) -> bool {
        match self {
            Self::Directory(source) => source.is_changed(),
            Self::PlaylistFile(source) => source.is_changed(),
            Self::Drive(source) => source.is_changed(),
        }
    }

    fn idle_message(&self) -> String {
        match self {
            Self::Directory(source) => source.idle_message(),
            Self::PlaylistFile(source) => source.idle_message(),
            Self::Drive(source) => source.idle_message(),
        }
    }
}
