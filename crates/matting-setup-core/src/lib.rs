//! Install-time build orchestration for the libmatting native library.
//!
//! This crate provides:
//! - Platform detection and compile command resolution
//! - Blocking compiler invocation with degraded-mode fallback
//! - A staged package install step
//! - Cleanup of transient build directories
//!
//! The install never fails because the native library did not build;
//! only an unsupported platform aborts it.

pub mod compile;
pub mod error;
pub mod install;
pub mod manifest;
pub mod paths;

pub use compile::{
    BuildConfig, BuildResult, CommandTable, CompileCommand, CompilerInvoker, Platform,
    PlatformResolver, ProcessRunner, SystemRunner,
};
pub use error::{Error, Result};
pub use install::{
    ArtifactCleaner, DegradedModeHandler, Health, InstallLifecycle, InstallOutcome, InstallPlan,
    InstallRequest, InstallStep, LifecycleState, StagedInstaller,
};
pub use manifest::{MANIFEST_FILE, PackageManifest};
pub use paths::{InstallContext, ProjectDirs};
