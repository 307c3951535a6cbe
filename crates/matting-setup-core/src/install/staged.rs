//! The wrapped package install step.
//!
//! [`StagedInstaller`] copies the package tree into `build/lib/<name>`,
//! writes generated metadata next to it, then copies both into the
//! install prefix. Native sources are left behind; only the package data
//! entries (the built libraries) travel with the package.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::manifest::PackageManifest;
use crate::paths::ProjectDirs;

/// Everything the install step needs to know.
#[derive(Debug, Clone, Copy)]
pub struct InstallPlan<'a> {
    pub dirs: &'a ProjectDirs,
    pub manifest: &'a PackageManifest,

    /// Destination prefix; the package lands in `<prefix>/<name>`.
    pub prefix: &'a Path,

    /// Files under the native source dir to ship, relative to the package dir.
    pub package_data: &'a [PathBuf],
}

impl InstallPlan<'_> {
    /// Directory of the installed package.
    pub fn installed_package_dir(&self) -> PathBuf {
        self.prefix.join(&self.manifest.name)
    }
}

/// The standard package install procedure wrapped by the lifecycle.
pub trait InstallStep {
    /// Install the package, returning every file written under the prefix.
    fn install(&self, plan: &InstallPlan<'_>) -> Result<Vec<PathBuf>>;
}

/// Stage, write metadata, then copy into the prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct StagedInstaller;

impl StagedInstaller {
    pub fn new() -> Self {
        Self
    }

    /// Copy the package tree into the staging directory.
    fn stage(&self, plan: &InstallPlan<'_>) -> Result<PathBuf> {
        let dirs = plan.dirs;
        if !dirs.package_dir.is_dir() {
            return Err(Error::Install(format!(
                "package directory {} not found",
                dirs.package_dir.display()
            )));
        }

        let stage_dir = dirs.build_dir.join("lib").join(&plan.manifest.name);
        fs::create_dir_all(&stage_dir)?;

        for entry in WalkDir::new(&dirs.package_dir).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&dirs.package_dir) else {
                continue;
            };
            if path.starts_with(&dirs.source_dir)
                && !plan.package_data.iter().any(|data| data == relative)
            {
                continue;
            }

            copy_file(path, &stage_dir.join(relative))?;
        }

        debug!("staged {} into {}", plan.manifest.name, stage_dir.display());
        Ok(stage_dir)
    }

    /// Write `PKG-INFO`, `requires.txt` and `SOURCES.txt`.
    fn write_metadata(&self, plan: &InstallPlan<'_>, staged: &[PathBuf]) -> Result<()> {
        let dir = &plan.dirs.metadata_dir;
        fs::create_dir_all(dir)?;

        let description = plan.manifest.long_description(&plan.dirs.root)?;
        fs::write(
            dir.join("PKG-INFO"),
            plan.manifest.render_pkg_info(description.as_deref()),
        )?;

        let mut requires = plan.manifest.requires.join("\n");
        if !requires.is_empty() {
            requires.push('\n');
        }
        fs::write(dir.join("requires.txt"), requires)?;

        let sources: String = staged
            .iter()
            .map(|p| format!("{}\n", p.display()))
            .collect();
        fs::write(dir.join("SOURCES.txt"), sources)?;
        Ok(())
    }
}

impl InstallStep for StagedInstaller {
    fn install(&self, plan: &InstallPlan<'_>) -> Result<Vec<PathBuf>> {
        info!("installing {} {}", plan.manifest.name, plan.manifest.version);

        let stage_dir = self.stage(plan)?;
        let staged = relative_files(&stage_dir)?;
        self.write_metadata(plan, &staged)?;

        let mut installed = copy_tree(&stage_dir, &plan.installed_package_dir())?;
        installed.extend(copy_tree(
            &plan.dirs.metadata_dir,
            &plan.prefix.join(plan.manifest.installed_metadata_dir_name()),
        )?);

        info!("installed {} files into {}", installed.len(), plan.prefix.display());
        Ok(installed)
    }
}

fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)?;
    Ok(())
}

/// Files under `dir`, relative to it, sorted.
fn relative_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(dir) {
                files.push(relative.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// Copy every file under `from` into `to`, returning the destination paths.
fn copy_tree(from: &Path, to: &Path) -> io::Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for relative in relative_files(from)? {
        let dest = to.join(&relative);
        copy_file(&from.join(&relative), &dest)?;
        copied.push(dest);
    }
    Ok(copied)
}
