//! Working directory restoration around the compile step.
//!
//! Kept in its own test binary: the runner here changes the process
//! working directory, which would race with tests that read it.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use matting_setup_core::{
    BuildConfig, InstallLifecycle, InstallPlan, InstallRequest, InstallStep, PackageManifest,
    ProcessRunner,
};
use tempfile::TempDir;

/// Runner that changes into the build directory like a shell `cd` would.
struct ChdirRunner;

impl ProcessRunner for ChdirRunner {
    fn run(&self, _: &str, _: &[String], working_dir: &Path) -> io::Result<Option<i32>> {
        env::set_current_dir(working_dir)?;
        Ok(Some(1))
    }
}

struct NoopInstaller;

impl InstallStep for NoopInstaller {
    fn install(&self, _: &InstallPlan<'_>) -> matting_setup_core::Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

#[test]
fn working_directory_restored_after_runner_changes_it() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let source_dir = temp.path().join("matting").join("c");
    fs::create_dir_all(&source_dir).unwrap();
    let manifest =
        PackageManifest::parse("[package]\nname = \"matting\"\nversion = \"1\"\n").unwrap();

    let cwd = env::current_dir().unwrap();
    let mut lifecycle = InstallLifecycle::new(BuildConfig::default(), ChdirRunner, NoopInstaller);
    let outcome = lifecycle
        .run(&InstallRequest {
            platform: "linux",
            root: temp.path(),
            prefix: &temp.path().join("site"),
            manifest: &manifest,
        })
        .unwrap();

    assert!(outcome.is_degraded());
    assert_eq!(env::current_dir().unwrap(), cwd);
}
