//! Install lifecycle around the compile step.
//!
//! This module provides:
//! - Degraded-mode handling for failed builds
//! - The wrapped package install step
//! - Transient directory cleanup
//! - The lifecycle state machine tying them together

mod cleaner;
mod degrade;
mod lifecycle;
mod staged;

pub use cleaner::ArtifactCleaner;
pub use degrade::{DegradedModeHandler, Health};
pub use lifecycle::{InstallLifecycle, InstallOutcome, InstallRequest, LifecycleState};
pub use staged::{InstallPlan, InstallStep, StagedInstaller};
