//! Native library compile step.
//!
//! This module provides:
//! - Platform identification
//! - The per-platform command table and its resolver
//! - Blocking compiler invocation
//!
//! # Architecture
//!
//! ```text
//! BuildConfig ──► CommandTable
//!                     │
//! host identifier ──► PlatformResolver ──► CompileCommand
//!                                               │
//!                     native source dir ──► CompilerInvoker ──► BuildResult
//! ```

mod invoker;
mod platform;
mod resolver;
mod table;
mod types;

pub use invoker::{BuildResult, CompilerInvoker, ProcessRunner, SystemRunner};
pub use platform::Platform;
pub use resolver::PlatformResolver;
pub use table::{CommandTable, CommandTemplate};
pub use types::{BuildConfig, CompileCommand, DEFAULT_FLAGS, DEFAULT_SOURCES, Toolchain};
