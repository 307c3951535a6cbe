//! Host platform identification.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// A platform the native library can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(rename = "win32")]
    Windows,
    Linux,
    Darwin,
}

impl Platform {
    /// All platforms in command-table order.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::Darwin];

    /// Identifier string for the platform (`win32`, `linux`, `darwin`).
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Windows => "win32",
            Self::Linux => "linux",
            Self::Darwin => "darwin",
        }
    }

    /// Identifier of the host this process runs on.
    ///
    /// Operating systems without a mapping report their own name, which
    /// no command table recognizes.
    pub fn host_identifier() -> &'static str {
        match std::env::consts::OS {
            "windows" => "win32",
            "macos" => "darwin",
            other => other,
        }
    }

    /// Platform-specific dynamic library extension.
    pub fn dylib_extension(self) -> &'static str {
        match self {
            Self::Windows => "dll",
            Self::Linux | Self::Darwin => "so",
        }
    }

    /// Whether the compiler needs `-fPIC -lm` on this platform.
    pub fn needs_pic(self) -> bool {
        !matches!(self, Self::Windows)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.identifier() == s)
            .ok_or_else(|| Error::UnsupportedPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_roundtrip() {
        for platform in Platform::ALL {
            assert_eq!(platform.identifier().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let err = "haiku".parse::<Platform>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform(ref p) if p == "haiku"));
    }

    #[test]
    fn test_dylib_extension() {
        assert_eq!(Platform::Windows.dylib_extension(), "dll");
        assert_eq!(Platform::Linux.dylib_extension(), "so");
        assert_eq!(Platform::Darwin.dylib_extension(), "so");
    }

    #[test]
    fn test_host_identifier() {
        let id = Platform::host_identifier();
        #[cfg(target_os = "linux")]
        assert_eq!(id, "linux");
        #[cfg(target_os = "macos")]
        assert_eq!(id, "darwin");
        #[cfg(target_os = "windows")]
        assert_eq!(id, "win32");
        assert!(!id.is_empty());
    }
}
