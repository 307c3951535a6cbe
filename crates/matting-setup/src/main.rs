//! matting-setup - builds libmatting and installs the matting package.

mod clean;
mod colors;
mod install;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "matting-setup")]
#[command(about = "Build the native matting library and install the package")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the native library (if possible) and install the package
    Install {
        /// Project root containing package.toml
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Installation prefix; the package lands in <prefix>/<name>
        #[arg(long)]
        prefix: PathBuf,

        /// Manifest path (default: <root>/package.toml)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// C compiler for GCC-style builds
        #[arg(long, default_value = "gcc")]
        compiler: String,

        /// Build with MSVC on Windows (run vcvars64.bat first)
        #[arg(long)]
        msvc: bool,

        /// Platform identifier to build for instead of the host's
        #[arg(long, hide = true)]
        platform: Option<String>,

        /// Write the install outcome as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Fail if the native library could not be built
        #[arg(long)]
        require_native: bool,
    },

    /// Remove transient build directories
    Clean {
        /// Project root containing package.toml
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Attach recovery hints to core errors
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<matting_setup_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Install {
            root,
            prefix,
            manifest,
            compiler,
            msvc,
            platform,
            report,
            require_native,
        } => {
            let options = install::InstallOptions {
                root,
                prefix,
                manifest,
                compiler,
                msvc,
                platform,
                report,
                require_native,
            };
            install::execute(&options).map_err(format_error)?;
        }

        Commands::Clean { root } => clean::execute(&root).map_err(format_error)?,
    }

    Ok(())
}
