//! Clean command implementation.
//!
//! Removes the transient directories an interrupted install may leave.

use std::path::Path;

use matting_setup_core::{ArtifactCleaner, BuildConfig, MANIFEST_FILE, PackageManifest, ProjectDirs};

use crate::colors::Style;

/// Remove `build/` and the generated metadata directory under `root`.
pub fn execute(root: &Path) -> anyhow::Result<()> {
    let manifest = PackageManifest::load(&root.join(MANIFEST_FILE))?;
    let dirs = ProjectDirs::new(root, &manifest, &BuildConfig::default());

    ArtifactCleaner::new().clean(&dirs.cleanup_targets());

    println!("{} {}", Style::Ok.paint("Cleaned"), root.display());
    Ok(())
}
