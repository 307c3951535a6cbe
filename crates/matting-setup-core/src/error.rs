//! Error types for matting-setup-core.

use thiserror::Error;

/// Result type for matting-setup-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort an install run.
///
/// A failed compile is deliberately absent: it is reported through
/// [`BuildResult`](crate::compile::BuildResult) and never aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The host platform has no entry in the command table.
    #[error("{0} platform not supported")]
    UnsupportedPlatform(String),

    /// The package manifest is missing a field or holds an invalid value.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// The package manifest is not valid TOML.
    #[error("failed to parse manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// The wrapped install step failed.
    #[error("install failed: {0}")]
    Install(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get a recovery hint for the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPlatform(_) => {
                Some("supported platforms are win32, linux and darwin")
            }
            Self::Manifest(_) | Self::ManifestParse(_) => {
                Some("check package.toml at the project root")
            }
            Self::Install(_) | Self::Io(_) => None,
        }
    }

    /// Format the error with its recovery hint appended.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
