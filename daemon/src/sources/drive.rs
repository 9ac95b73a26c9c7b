use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::sources::MediaSource;

/// Removable drives mounted below a common root, e.g. `/mnt/usbdrive0`, `/mnt/usbdrive1`.
///
/// Every directory directly below the root is a search path. A change is reported whenever the
/// set of those directories differs from the last observed one.
pub struct DriveSource {
    root: PathBuf,
    mounted: BTreeSet<PathBuf>,
}

impl DriveSource {
    pub fn new(root: PathBuf) -> Self {
        let mounted = mounted(&root);
        Self { root, mounted }
    }
}

fn mounted(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("cannot read {}: {err}", root.to_string_lossy());
                None
            }
        })
        .filter(|entry| entry.path().is_dir())
        .map(DirEntry::into_path)
        .collect()
}

impl MediaSource for DriveSource {
    fn search_paths(&self) -> Vec<PathBuf> {
        self.mounted.iter().cloned().collect()
    }

    fn is_changed(&mut self) -> bool {
        let current = mounted(&self.root);
        if current == self.mounted {
            return false;
        }
        log::info!("drives under {} changed", self.root.to_string_lossy());
        self.mounted = current;
        true
    }

    fn idle_message(&self) -> String {
        "Insert USB drive with compatible movies.".to_string()
    }
}
