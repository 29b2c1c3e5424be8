// codemend/src/cli.rs
//! Command-line interface for the `codemend` binary: global flags shared by
//! every run, and one subcommand per pass or pass sequence.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use codemend_core::{PassKind, GUARD_PIPELINE};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "codemend",
    author = "Obscura Tech",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rewrite TypeScript sources in place with ordered regex passes",
    long_about = "codemend migrates console.log debugging to a structured logger, annotates caught errors, retrofits optional chaining onto property accesses, and repairs the numeric-literal corruption that optional-chaining injection is known to cause. Files are rewritten in place unless --dry-run is given.",
    arg_required_else_help = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to a YAML configuration file.
    #[arg(long = "config", value_name = "FILE", global = true, env = "CODEMEND_CONFIG", help = "Path to a YAML configuration file (defaults to ./codemend.yaml, then the user config dir).")]
    pub config: Option<PathBuf>,

    /// Project root to scan.
    #[arg(long = "root", value_name = "DIR", global = true, help = "Project root to scan (overrides selector.root; defaults to the current directory).")]
    pub root: Option<PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long = "dry-run", global = true, help = "Report what would change without writing any file.")]
    pub dry_run: bool,

    /// Print a unified diff for every modified file.
    #[arg(long = "diff", global = true, help = "Print a unified diff for every modified file.")]
    pub diff: bool,

    /// Re-run the pass on its own output and warn about files that keep changing.
    #[arg(long = "verify-fixed-point", global = true, help = "Re-run each pass on its own output and warn about files that keep changing.")]
    pub verify_fixed_point: bool,

    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress the summary and all log output except errors.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Disable colored output even on a terminal.
    #[arg(long = "no-color", global = true, help = "Disable colored output.")]
    pub no_color: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,
}

/// All available commands for the `codemend` CLI.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Replaces console.log debugging with the structured logger.
    #[command(name = "debug-log", about = "Replace console.log debugging with this.logger.debug and inject the logger.")]
    DebugLog,

    /// Annotates caught errors with a type cast.
    #[command(name = "error-cast", about = "Annotate logged and rethrown catch variables with an Error cast.")]
    ErrorCast,

    /// Rewrites property accesses to optional chaining.
    #[command(name = "optional-access", about = "Rewrite property accesses to optional chaining (may corrupt decimal literals; run repair after).")]
    OptionalAccess,

    /// Repairs corruption left by optional-access.
    #[command(name = "repair", about = "Repair decimal literals and operators corrupted by optional-access.")]
    Repair,

    /// Runs optional-access followed by repair.
    #[command(name = "pipeline", about = "Run optional-access followed by repair.")]
    Pipeline,

    /// Runs every pass in order.
    #[command(name = "all", about = "Run debug-log, error-cast, optional-access and repair in order.")]
    All,

    /// Lists each pass's rules.
    #[command(name = "rules", about = "List every pass with its rules and their descriptions.")]
    Rules,
}

impl Commands {
    /// The passes this command runs, in order. Empty for `rules`.
    pub fn passes(self) -> Vec<PassKind> {
        match self {
            Commands::DebugLog => vec![PassKind::DebugLog],
            Commands::ErrorCast => vec![PassKind::ErrorCast],
            Commands::OptionalAccess => vec![PassKind::OptionalAccess],
            Commands::Repair => vec![PassKind::Repair],
            Commands::Pipeline => GUARD_PIPELINE.to_vec(),
            Commands::All => PassKind::ALL.to_vec(),
            Commands::Rules => Vec::new(),
        }
    }
}
