//! Install lifecycle orchestration.
//!
//! ```text
//! Start ──► Compiling ──► Degrading ──► WrappedInstall ──► Cleanup ──► Done
//!   │
//!   └──► Fatal (unsupported platform)
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::compile::{
    BuildConfig, BuildResult, CommandTable, CompileCommand, CompilerInvoker, Platform,
    PlatformResolver, ProcessRunner,
};
use crate::error::Result;
use crate::manifest::PackageManifest;
use crate::paths::{InstallContext, ProjectDirs};

use super::cleaner::ArtifactCleaner;
use super::degrade::{DegradedModeHandler, Health};
use super::staged::{InstallPlan, InstallStep};

/// Lifecycle states, entered strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Start,
    Compiling,
    Degrading,
    WrappedInstall,
    Cleanup,
    Done,
    Fatal,
}

/// What a completed install run produced.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub platform: Platform,
    pub command: CompileCommand,
    pub build: BuildResult,
    pub health: Health,

    /// Warnings emitted during the run, in order.
    pub warnings: Vec<String>,

    /// Installed native library, if it was built.
    pub artifact: Option<PathBuf>,

    /// Every file written under the prefix.
    pub installed_files: Vec<PathBuf>,

    /// States visited, in order.
    pub states: Vec<LifecycleState>,
}

impl InstallOutcome {
    pub fn is_degraded(&self) -> bool {
        self.health.is_degraded()
    }
}

/// Where and what to install.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Host platform identifier, e.g. [`Platform::host_identifier`].
    pub platform: &'a str,
    pub root: &'a Path,
    pub prefix: &'a Path,
    pub manifest: &'a PackageManifest,
}

/// Runs the compile step around a wrapped install step.
pub struct InstallLifecycle<R, S> {
    config: BuildConfig,
    table: CommandTable,
    invoker: CompilerInvoker<R>,
    installer: S,
    cleaner: ArtifactCleaner,
    states: Vec<LifecycleState>,
}

impl<R: ProcessRunner, S: InstallStep> InstallLifecycle<R, S> {
    /// Create a lifecycle with the command table derived from `config`.
    pub fn new(config: BuildConfig, runner: R, installer: S) -> Self {
        let table = CommandTable::from_config(&config);
        Self::with_table(config, table, runner, installer)
    }

    /// Create a lifecycle with an explicit command table.
    pub fn with_table(config: BuildConfig, table: CommandTable, runner: R, installer: S) -> Self {
        Self {
            config,
            table,
            invoker: CompilerInvoker::new(runner),
            installer,
            cleaner: ArtifactCleaner::new(),
            states: Vec::new(),
        }
    }

    /// Borrow the process runner.
    pub fn runner(&self) -> &R {
        self.invoker.runner()
    }

    /// Borrow the wrapped install step.
    pub fn installer(&self) -> &S {
        &self.installer
    }

    /// States visited by the last run.
    pub fn states(&self) -> &[LifecycleState] {
        &self.states
    }

    /// Run the full lifecycle once.
    ///
    /// # Errors
    /// Fails with [`Error::UnsupportedPlatform`](crate::Error::UnsupportedPlatform)
    /// before any side effect if the platform has no command table entry,
    /// or with the wrapped install step's error. A failed compile is not
    /// an error; see [`InstallOutcome::health`].
    pub fn run(&mut self, request: &InstallRequest<'_>) -> Result<InstallOutcome> {
        self.states.clear();
        self.enter(LifecycleState::Start);

        let resolved = PlatformResolver::new(&self.table).resolve(request.platform);
        let (platform, command) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                self.enter(LifecycleState::Fatal);
                error!("{e}");
                return Err(e);
            }
        };

        let dirs = ProjectDirs::new(request.root, request.manifest, &self.config);

        self.enter(LifecycleState::Compiling);
        let build = self.compile(&command, &dirs.source_dir);

        self.enter(LifecycleState::Degrading);
        let health = DegradedModeHandler::new(command.output.clone()).handle(&build);
        let warnings = match &health {
            Health::Native => Vec::new(),
            Health::Degraded { warning } => vec![warning.clone()],
        };

        self.enter(LifecycleState::WrappedInstall);
        let mut package_data = self.package_data(&dirs);
        let artifact_rel = self
            .relative_source_dir(&dirs)
            .map(|rel| rel.join(&command.output));
        if health.is_degraded() {
            // A library left over from an earlier build must not ship as this one.
            if let Some(rel) = &artifact_rel {
                package_data.retain(|data| data != rel);
                remove_stale(&request.prefix.join(&request.manifest.name).join(rel));
            }
        }
        let plan = InstallPlan {
            dirs: &dirs,
            manifest: request.manifest,
            prefix: request.prefix,
            package_data: &package_data,
        };
        let installed = self.installer.install(&plan);

        self.enter(LifecycleState::Cleanup);
        self.cleaner.clean(&dirs.cleanup_targets());

        let installed_files = installed?;
        let artifact = artifact_rel
            .filter(|_| !health.is_degraded())
            .map(|rel| plan.installed_package_dir().join(rel))
            .filter(|path| path.is_file());

        self.enter(LifecycleState::Done);
        Ok(InstallOutcome {
            platform,
            command,
            build,
            health,
            warnings,
            artifact,
            installed_files,
            states: self.states.clone(),
        })
    }

    fn enter(&mut self, state: LifecycleState) {
        info!(?state, "lifecycle");
        self.states.push(state);
    }

    /// Invoke the compiler in `source_dir`.
    ///
    /// The runner gets the directory explicitly. The captured context only
    /// matters for runners that chdir themselves: dropping it puts the
    /// process working directory back.
    fn compile(&self, command: &CompileCommand, source_dir: &Path) -> BuildResult {
        let _context = InstallContext::capture(source_dir)
            .map_err(|e| debug!("cannot read working directory: {e}"))
            .ok();
        self.invoker.invoke(command, source_dir)
    }

    /// Native source dir relative to the package dir (`c` for `matting/c`).
    fn relative_source_dir(&self, dirs: &ProjectDirs) -> Option<PathBuf> {
        dirs.source_dir
            .strip_prefix(&dirs.package_dir)
            .ok()
            .map(Path::to_path_buf)
    }

    /// Library filenames for every platform, relative to the package dir.
    fn package_data(&self, dirs: &ProjectDirs) -> Vec<PathBuf> {
        let Some(rel) = self.relative_source_dir(dirs) else {
            return Vec::new();
        };
        self.config
            .artifact_names()
            .into_iter()
            .map(|name| rel.join(name))
            .collect()
    }
}

/// Delete a previously installed library that this run did not rebuild.
fn remove_stale(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("removed stale {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => debug!("failed to remove stale {}: {}", path.display(), e),
    }
}
