//! Best-effort removal of transient build directories.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Removes transient directories after install.
///
/// Each target is first renamed aside and then deleted, so its original
/// path is either gone or untouched. Failures are logged and swallowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtifactCleaner;

impl ArtifactCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Remove every directory in `directories` that exists.
    pub fn clean(&self, directories: &[PathBuf]) {
        info!("cleanup");
        for dir in directories {
            self.remove(dir);
        }
    }

    fn remove(&self, dir: &Path) {
        if !dir.is_dir() {
            debug!("{} absent, skipping", dir.display());
            return;
        }

        let Some(doomed) = Self::tombstone(dir) else {
            debug!("{} has no file name, skipping", dir.display());
            return;
        };

        if let Err(e) = fs::rename(dir, &doomed) {
            debug!("failed to move {} aside: {}", dir.display(), e);
            return;
        }
        match fs::remove_dir_all(&doomed) {
            Ok(()) => debug!("removed {}", dir.display()),
            Err(e) => debug!("failed to remove {}: {}", doomed.display(), e),
        }
    }

    fn tombstone(dir: &Path) -> Option<PathBuf> {
        let name = dir.file_name()?.to_string_lossy();
        Some(dir.with_file_name(format!(".{}.removing-{}", name, std::process::id())))
    }
}
