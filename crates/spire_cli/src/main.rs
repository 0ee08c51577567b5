//! Spire CLI: the command-line interface for the Spire shader build pipeline.
//!
//! Provides `spire build` for incremental compilation of a shader tree,
//! `spire status` for listing stale artifacts, `spire variants` for inspecting
//! material expansion, and `spire init` for project scaffolding.

#![warn(missing_docs)]

mod build;
mod init;
mod project;
mod status;
mod variants;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Spire: incremental shader artifact builder.
#[derive(Parser, Debug)]
#[command(name = "spire", version, about = "Spire shader build pipeline")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `spire.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every stale shader artifact.
    Build(BuildArgs),
    /// List artifacts that would be rebuilt, with reasons.
    Status(StatusArgs),
    /// Show the artifacts a material source expands into.
    Variants(VariantsArgs),
    /// Create a starter `spire.toml`.
    Init {
        /// Directory to initialize. Defaults to the current directory.
        dir: Option<String>,
    },
}

/// Arguments for the `spire build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Override the configured input directory.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the configured output directory.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Maximum concurrent compiler invocations (0 = all cores).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Stop starting new jobs after the first failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format for the build report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `spire status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Override the configured input directory.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the configured output directory.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `spire variants` subcommand.
#[derive(Parser, Debug)]
pub struct VariantsArgs {
    /// Material source file, e.g. `shaders/materials/metal.slang`.
    pub material: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Variants(ref args) => variants::run(args),
        Command::Init { dir } => init::run(dir, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` refines the level chosen
/// by `--quiet`/`--verbose`.
fn init_logging(global: &GlobalArgs) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(log_level(global).into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn log_level(global: &GlobalArgs) -> tracing::Level {
    if global.quiet {
        tracing::Level::ERROR
    } else if global.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}
