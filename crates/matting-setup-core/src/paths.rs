//! Project directory layout.
//!
//! Provides the paths every lifecycle step agrees on:
//!
//! ```text
//! <root>/
//! ├── package.toml
//! ├── matting/            # package tree
//! │   └── c/              # native sources, artifact lands here
//! ├── build/              # staged install tree (transient)
//! └── matting.pkg-info/   # generated metadata (transient)
//! ```

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::compile::BuildConfig;
use crate::manifest::PackageManifest;

/// Directory structure of a project being installed.
#[derive(Debug, Clone)]
pub struct ProjectDirs {
    /// Project root (holds the manifest).
    pub root: PathBuf,

    /// Package tree copied into the install prefix.
    pub package_dir: PathBuf,

    /// Native source directory the compiler runs in.
    pub source_dir: PathBuf,

    /// Transient staging directory.
    pub build_dir: PathBuf,

    /// Transient generated metadata directory.
    pub metadata_dir: PathBuf,
}

impl ProjectDirs {
    /// Lay out directories for `manifest` under `root`.
    ///
    /// Nothing is created on disk.
    pub fn new(root: &Path, manifest: &PackageManifest, config: &BuildConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            package_dir: root.join(&manifest.name),
            source_dir: root.join(&config.source_dir),
            build_dir: root.join("build"),
            metadata_dir: root.join(manifest.metadata_dir_name()),
        }
    }

    /// Directories removed after install.
    pub fn cleanup_targets(&self) -> Vec<PathBuf> {
        vec![self.build_dir.clone(), self.metadata_dir.clone()]
    }
}

/// Transient state for the compile step.
///
/// Records the process working directory on creation and puts it back
/// when dropped, so every exit path (including unwinding) leaves it as
/// it was found.
#[derive(Debug)]
pub struct InstallContext {
    original_dir: PathBuf,
    source_dir: PathBuf,
}

impl InstallContext {
    /// Capture the current working directory.
    pub fn capture(source_dir: &Path) -> std::io::Result<Self> {
        Ok(Self {
            original_dir: env::current_dir()?,
            source_dir: source_dir.to_path_buf(),
        })
    }

    pub fn original_dir(&self) -> &Path {
        &self.original_dir
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

impl Drop for InstallContext {
    fn drop(&mut self) {
        if env::current_dir().is_ok_and(|cwd| cwd == self.original_dir) {
            return;
        }
        if let Err(e) = env::set_current_dir(&self.original_dir) {
            warn!(
                "failed to restore working directory {}: {}",
                self.original_dir.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> PackageManifest {
        PackageManifest::parse("[package]\nname = \"matting\"\nversion = \"1.0\"\n").unwrap()
    }

    #[test]
    fn test_layout() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let dirs = ProjectDirs::new(temp.path(), &manifest(), &BuildConfig::default());

        assert_eq!(dirs.package_dir, temp.path().join("matting"));
        assert_eq!(dirs.source_dir, temp.path().join("matting").join("c"));
        assert!(dirs.build_dir.ends_with("build"));
        assert!(dirs.metadata_dir.ends_with("matting.pkg-info"));
        assert_eq!(dirs.cleanup_targets().len(), 2);
        assert!(!dirs.build_dir.exists());
    }

    #[test]
    fn test_context_records_cwd() {
        let cwd = env::current_dir().unwrap();
        let context = InstallContext::capture(Path::new("matting/c")).unwrap();
        assert_eq!(context.original_dir(), cwd);
        assert_eq!(context.source_dir(), Path::new("matting/c"));
        drop(context);
        assert_eq!(env::current_dir().unwrap(), cwd);
    }
}
