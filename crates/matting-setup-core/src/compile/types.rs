//! Common types for the compile step.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::platform::Platform;

/// Default native sources, in link order.
pub const DEFAULT_SOURCES: [&str; 5] = [
    "ichol.c",
    "knn.c",
    "kdtree.c",
    "boxfilter.c",
    "labelexpand.c",
];

/// Default flags shared by every GCC-style entry.
pub const DEFAULT_FLAGS: [&str; 6] = ["-O3", "-Wall", "-Wextra", "-pedantic", "-shared", "-std=c99"];

/// Configuration for the native build.
///
/// Built once at process start and handed to
/// [`CommandTable::from_config`](super::CommandTable::from_config).
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Compiler executable for GCC-style entries.
    pub compiler: String,

    /// Build the Windows entry with MSVC (`cl`) instead of `compiler`.
    ///
    /// Requires the MSVC environment (`vcvars64.bat`) to be loaded in the
    /// calling shell.
    pub use_msvc: bool,

    /// Library base name; `matting` produces `libmatting.so`.
    pub library: String,

    /// Native source directory, relative to the project root.
    pub source_dir: PathBuf,

    /// Native sources, compiled together in this order.
    pub sources: Vec<String>,

    /// Flags shared by every GCC-style entry.
    pub flags: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: "gcc".to_string(),
            use_msvc: false,
            library: "matting".to_string(),
            source_dir: PathBuf::from("matting").join("c"),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            flags: DEFAULT_FLAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuildConfig {
    /// Config using a different compiler executable.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Config that builds the Windows entry with MSVC.
    pub fn with_msvc(mut self, use_msvc: bool) -> Self {
        self.use_msvc = use_msvc;
        self
    }

    /// Output filename of the library on `platform`.
    pub fn artifact_name(&self, platform: Platform) -> String {
        format!("lib{}.{}", self.library, platform.dylib_extension())
    }

    /// Artifact names for every platform, deduplicated, in platform order.
    ///
    /// These are the package data entries shipped alongside the package.
    pub fn artifact_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for platform in Platform::ALL {
            let name = self.artifact_name(platform);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Compiler command-line dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    /// `gcc`/`clang`: `<flags> <sources> <link flags> -o <output>`
    Gnu,
    /// `cl`: `<flags> /Fe<output> <sources>`
    Msvc,
}

/// A fully bound compile command.
///
/// Arguments are passed to the process directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileCommand {
    /// Compiler executable.
    pub compiler: String,

    /// Command-line dialect.
    pub toolchain: Toolchain,

    /// Flags placed before the sources.
    pub flags: Vec<String>,

    /// Source files, in order.
    pub sources: Vec<String>,

    /// Flags placed after the sources (position-independent code, libm).
    pub link_flags: Vec<String>,

    /// Output artifact filename.
    pub output: String,
}

impl CompileCommand {
    /// Full argument list, excluding the compiler itself.
    pub fn args(&self) -> Vec<String> {
        let mut args = self.flags.clone();
        match self.toolchain {
            Toolchain::Gnu => {
                args.extend(self.sources.iter().cloned());
                args.extend(self.link_flags.iter().cloned());
                args.push("-o".to_string());
                args.push(self.output.clone());
            }
            Toolchain::Msvc => {
                args.push(format!("/Fe{}", self.output));
                args.extend(self.sources.iter().cloned());
                args.extend(self.link_flags.iter().cloned());
            }
        }
        args
    }
}

impl fmt::Display for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compiler)?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
