//! Non-fatal handling of a failed native build.

use serde::Serialize;
use tracing::warn;

use crate::compile::BuildResult;

/// Whether the native library is available after the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum Health {
    /// The native library was built.
    Native,
    /// The native library is missing; only non-native methods work.
    Degraded { warning: String },
}

impl Health {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Turns a failed [`BuildResult`] into a warning instead of an error.
#[derive(Debug, Clone)]
pub struct DegradedModeHandler {
    artifact: String,
    fallback: String,
}

impl DegradedModeHandler {
    /// Handler for the library `artifact` (e.g. `libmatting.so`).
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            fallback: "vcycle".to_string(),
        }
    }

    /// Name the method set that still works without the library.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Inspect `result`, emitting one warning on failure.
    ///
    /// Never fails.
    pub fn handle(&self, result: &BuildResult) -> Health {
        let Some(reason) = result.failure_reason() else {
            return Health::Native;
        };

        let warning = format!(
            "Failed to compile {} ({}). Only the {} method will be available.",
            self.artifact, reason, self.fallback
        );
        warn!("{warning}");
        Health::Degraded { warning }
    }
}
