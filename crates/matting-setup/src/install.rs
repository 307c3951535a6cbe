//! Install command implementation.
//!
//! Compiles the native library for the host platform, installs the
//! package, and reports whether the native library made it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use matting_setup_core::{
    BuildConfig, InstallLifecycle, InstallOutcome, InstallRequest, MANIFEST_FILE, PackageManifest,
    Platform, StagedInstaller, SystemRunner,
};

use crate::colors::{self, Style};

/// Options for the install command.
pub struct InstallOptions {
    pub root: PathBuf,
    pub prefix: PathBuf,
    pub manifest: Option<PathBuf>,
    pub compiler: String,
    pub msvc: bool,
    pub platform: Option<String>,
    pub report: Option<PathBuf>,
    pub require_native: bool,
}

/// Run the install lifecycle.
pub fn execute(options: &InstallOptions) -> anyhow::Result<()> {
    let start = Instant::now();

    let root = options
        .root
        .canonicalize()
        .with_context(|| format!("project root not found: {}", options.root.display()))?;
    let manifest_path = options
        .manifest
        .clone()
        .unwrap_or_else(|| root.join(MANIFEST_FILE));
    let manifest = PackageManifest::load(&manifest_path)?;

    let platform = options
        .platform
        .clone()
        .unwrap_or_else(|| Platform::host_identifier().to_string());

    println!(
        "\n{} - Installing {}\n",
        Style::Heading.paint("matting-setup"),
        Style::Accent.paint(format!("{} {}", manifest.name, manifest.version))
    );

    let config = BuildConfig::default()
        .with_compiler(options.compiler.as_str())
        .with_msvc(options.msvc);

    print!("{} ... ", Style::Step.paint("  ◆ Building and installing"));
    colors::flush_stdout();

    let mut lifecycle = InstallLifecycle::new(config, SystemRunner, StagedInstaller::new());
    let outcome = lifecycle.run(&InstallRequest {
        platform: &platform,
        root: &root,
        prefix: &options.prefix,
        manifest: &manifest,
    });
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            println!();
            return Err(e.into());
        }
    };

    println!("{}", Style::Ok.paint("✓"));

    if let Some(report) = &options.report {
        write_report(&outcome, report)?;
    }

    print_summary(&outcome, start);

    if options.require_native && outcome.is_degraded() {
        anyhow::bail!("native library {} was not built", outcome.command.output);
    }

    Ok(())
}

fn write_report(outcome: &InstallOutcome, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(outcome)?;
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(())
}

fn print_summary(outcome: &InstallOutcome, start: Instant) {
    println!();
    match &outcome.artifact {
        Some(artifact) => println!("{} {}", Style::Ok.paint("Native:"), artifact.display()),
        None => println!("{} not built (degraded mode)", Style::Degraded.paint("Native:")),
    }
    println!("{} {}", Style::Label.paint("Platform:"), outcome.platform);
    println!(
        "{} {}",
        Style::Label.paint("Files:"),
        outcome.installed_files.len()
    );
    println!(
        "{} {:.2}s",
        Style::Label.paint("Time:"),
        start.elapsed().as_secs_f64()
    );
}
