//! Compiler invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info};

use super::types::CompileCommand;

/// Spawns a program and waits for it to exit.
///
/// The working directory is passed to the child explicitly; the calling
/// process's own working directory is never changed.
pub trait ProcessRunner {
    /// Run `program` with `args` inside `working_dir`.
    ///
    /// Returns the exit code, or `None` if the process was terminated
    /// without one (e.g. by a signal).
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> io::Result<Option<i32>>;
}

/// Runs programs as real child processes, inheriting stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Find `program` in PATH.
    fn locate(program: &str) -> io::Result<PathBuf> {
        which::which(program).map_err(|e| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{program} not found in PATH: {e}"),
            )
        })
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> io::Result<Option<i32>> {
        let path = Self::locate(program)?;
        debug!(program = %path.display(), cwd = %working_dir.display(), "spawning");

        let status = Command::new(&path)
            .args(args)
            .current_dir(working_dir)
            .status()?;

        Ok(status.code())
    }
}

/// Outcome of a single compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    /// Raw exit code; `None` if the process never exited normally.
    pub status: Option<i32>,

    /// Why the process could not be spawned, if it could not.
    pub spawn_error: Option<String>,
}

impl BuildResult {
    /// Result for a process that ran and exited.
    pub fn exited(status: Option<i32>) -> Self {
        Self {
            status,
            spawn_error: None,
        }
    }

    /// Result for a process that could not be started.
    pub fn spawn_failed(error: &io::Error) -> Self {
        Self {
            status: None,
            spawn_error: Some(error.to_string()),
        }
    }

    /// Returns true only for a zero exit code.
    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Short description of the failure, if any.
    pub fn failure_reason(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        Some(match (&self.spawn_error, self.status) {
            (Some(err), _) => format!("failed to start compiler: {err}"),
            (None, Some(code)) => format!("compiler exited with status {code}"),
            (None, None) => "compiler terminated without an exit status".to_string(),
        })
    }
}

/// Runs a [`CompileCommand`] once, blocking until it finishes.
pub struct CompilerInvoker<R> {
    runner: R,
}

impl<R: ProcessRunner> CompilerInvoker<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run `command` inside `working_dir`.
    ///
    /// Never fails: a spawn error is folded into the returned
    /// [`BuildResult`] exactly like a non-zero exit.
    pub fn invoke(&self, command: &CompileCommand, working_dir: &Path) -> BuildResult {
        info!("building {} in {}", command.output, working_dir.display());
        debug!(command = %command, "invoking compiler");

        match self.runner.run(&command.compiler, &command.args(), working_dir) {
            Ok(status) => BuildResult::exited(status),
            Err(e) => BuildResult::spawn_failed(&e),
        }
    }

    /// Borrow the underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::types::Toolchain;

    struct FixedRunner(io::Result<Option<i32>>);

    impl ProcessRunner for FixedRunner {
        fn run(&self, _: &str, _: &[String], _: &Path) -> io::Result<Option<i32>> {
            match &self.0 {
                Ok(code) => Ok(*code),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn command() -> CompileCommand {
        CompileCommand {
            compiler: "gcc".to_string(),
            toolchain: Toolchain::Gnu,
            flags: Vec::new(),
            sources: vec!["knn.c".to_string()],
            link_flags: Vec::new(),
            output: "libmatting.so".to_string(),
        }
    }

    #[test]
    fn test_zero_exit_is_success() {
        let invoker = CompilerInvoker::new(FixedRunner(Ok(Some(0))));
        let result = invoker.invoke(&command(), Path::new("."));
        assert!(result.is_success());
        assert!(result.failure_reason().is_none());
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let invoker = CompilerInvoker::new(FixedRunner(Ok(Some(1))));
        let result = invoker.invoke(&command(), Path::new("."));
        assert!(!result.is_success());
        assert_eq!(result.status, Some(1));
        assert_eq!(result.failure_reason().unwrap(), "compiler exited with status 1");
    }

    #[test]
    fn test_spawn_failure_is_failure() {
        let runner = FixedRunner(Err(io::Error::new(io::ErrorKind::NotFound, "gcc not found")));
        let result = CompilerInvoker::new(runner).invoke(&command(), Path::new("."));
        assert!(!result.is_success());
        assert!(result.failure_reason().unwrap().contains("gcc not found"));
    }

    #[test]
    fn test_signal_is_failure() {
        let result = CompilerInvoker::new(FixedRunner(Ok(None))).invoke(&command(), Path::new("."));
        assert!(!result.is_success());
        assert!(result.spawn_error.is_none());
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let err = SystemRunner
            .run("matting-setup-no-such-compiler", &[], Path::new("."))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
