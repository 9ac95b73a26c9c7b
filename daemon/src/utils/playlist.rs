//! Builds [`Playlist`]s from the search paths of a media source.
//!
//! If the first search path is a file, it is a playlist file: one media reference per line, kept
//! in file order without extension filtering.
//! Otherwise every existing search path is scanned as a directory (no recursion) for files with a
//! supported extension, and the results are sorted.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::playlist::Playlist;

/// Outcome of a scan.
#[derive(Debug, PartialEq)]
pub struct Scanned {
    pub playlist: Playlist,
    /// Volume hint read from the sound-volume file, if any directory had a valid one.
    pub volume: Option<i32>,
}

/// Scans `paths` and builds a [`Playlist`].
pub fn build(
    paths: &[PathBuf],
    extensions: &[String],
    sound_vol_file: &str,
    randomize: bool,
) -> Scanned {
    let Some(first) = paths.first() else {
        return Scanned {
            playlist: Playlist::default(),
            volume: None,
        };
    };

    if first.is_file() {
        return Scanned {
            playlist: Playlist::new(read_playlist_file(first), randomize),
            volume: None,
        };
    }

    let mut movies = Vec::new();
    let mut volume = None;
    for path in paths {
        if !path.is_dir() {
            continue;
        }
        movies.extend(scan_directory(path, extensions));
        if let Some(value) = read_volume_hint(&path.join(sound_vol_file)) {
            volume = Some(value);
        }
    }
    movies.sort();

    Scanned {
        playlist: Playlist::new(movies, randomize),
        volume,
    }
}

/// Reads a playlist file, skipping blank lines.
fn read_playlist_file(path: &Path) -> Vec<String> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::warn!("{}: {err}, treating as empty", path.to_string_lossy());
            return Vec::new();
        }
    };
    BufReader::new(file)
        .lines()
        .enumerate()
        .filter_map(|(line_no, line)| match line {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(err) => {
                log::warn!(
                    "{}:{} error: {}, skipping",
                    path.to_string_lossy(),
                    line_no + 1,
                    err
                );
                None
            }
        })
        .collect()
}

/// Lists non-hidden files in `dir` whose extension matches one of `extensions`.
fn scan_directory(dir: &Path, extensions: &[String]) -> Vec<String> {
    let base = dir.to_string_lossy();
    let base = base.trim_end_matches('/');

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("cannot read {}: {err}, skipping", dir.to_string_lossy());
                None
            }
        })
        .filter(|entry| !is_hidden(entry) && entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(ToString::to_string))
        .filter(|name| has_extension(name, extensions))
        .map(|name| format!("{base}/{name}"))
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Reads the first line of a sound-volume file as a decimal number.
/// The value is truncated towards zero.
#[allow(clippy::cast_possible_truncation)]
fn read_volume_hint(path: &Path) -> Option<i32> {
    let file = fs::File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    match line.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value.trunc() as i32),
        _ => {
            log::warn!(
                "{}: `{}` is not a number, ignoring",
                path.to_string_lossy(),
                line.trim()
            );
            None
        }
    }
}
