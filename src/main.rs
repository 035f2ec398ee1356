//! # build-script-helper CLI Entry Point
//!
//! Called by the Swift build-script to build or test indexstore-db with
//! SwiftPM. Parses arguments with clap, resolves paths and hands a validated
//! request to [`isdb_build::build::Session`].

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use isdb_build::HelperError;
use isdb_build::build::Session;
use isdb_build::config::{Action, InvocationRequest, Sanitizer};
use isdb_build::platform::Platform;
use isdb_build::process::{BuildTool, DryRun, SwiftPm};
use isdb_build::toolchain::Toolchain;

#[derive(Parser)]
#[command(name = "build-script-helper")]
#[command(about = "Build along with the Swift build-script.", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the package
    Build(CommonArgs),
    /// Test the package
    Test(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory of the package to build
    #[arg(long, value_name = "PATH", default_value = ".")]
    package_path: PathBuf,
    /// Build using the toolchain at PATH
    #[arg(long, value_name = "PATH")]
    toolchain: PathBuf,
    /// Ninja binary to use for testing
    #[arg(long, value_name = "PATH")]
    ninja_bin: Option<PathBuf>,
    /// Build in the given path
    #[arg(long, value_name = "PATH", default_value = ".build")]
    build_path: PathBuf,
    /// Build using configuration (release|debug)
    #[arg(short, long, default_value = "debug")]
    configuration: String,
    /// Build using the given sanitizer(s)
    #[arg(long, value_enum)]
    sanitize: Vec<Sanitizer>,
    /// Build using every available sanitizer in sub-directories of build path
    #[arg(long, conflicts_with = "sanitize")]
    sanitize_all: bool,
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
    /// Print the commands that would run without cleaning or spawning anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (action, args) = match cli.command {
        Commands::Build(args) => (Action::Build, args),
        Commands::Test(args) => (Action::Test, args),
    };

    init_tracing(args.verbose);

    match run(action, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            let code = e
                .downcast_ref::<HelperError>()
                .map(HelperError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(action: Action, args: &CommonArgs) -> Result<()> {
    let request = InvocationRequest::new(
        action,
        absolute(&args.package_path)?,
        absolute(&args.build_path)?,
        absolute(&args.toolchain)?,
    )
    .configuration(args.configuration.clone())
    .sanitizers(args.sanitize.iter().copied())
    .sanitize_all(args.sanitize_all)
    .ninja_bin(args.ninja_bin.clone())
    .verbose(args.verbose);

    request.validate()?;
    debug!(?request, "resolved request");

    let toolchain = Toolchain::new(request.toolchain_path.clone());
    let platform = Platform::current();

    if args.dry_run {
        drive(Session::dry_run(toolchain, platform), &request)
    } else {
        drive(Session::new(SwiftPm, toolchain, platform), &request)
    }
}

fn drive<T: BuildTool>(mut session: Session<T>, request: &InvocationRequest) -> Result<()> {
    session.run_all(request)?;
    Ok(())
}

/// Absolute and lexically normalized; symlinks are kept.
fn absolute(path: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path {}", path.display()))?;
    Ok(path_clean::clean(abs))
}
