//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Waymark - versioned migrations for application state and data directories
#[derive(Parser, Debug)]
#[command(name = "wm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override state file path
    #[arg(short, long, global = true, env = "WAYMARK_STATE")]
    pub state: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the recorded version and the migrations still owed
    Status(StatusArgs),

    /// Run all owed migrations
    Migrate(MigrateArgs),

    /// Move the contents of one directory into another
    Transfer(TransferArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Answer prompts from a file (one reply per line) instead of the terminal
    #[arg(short, long)]
    pub answers: Option<PathBuf>,
}

/// Arguments for the transfer command
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Directory whose contents are moved
    pub source: PathBuf,

    /// Directory receiving the contents
    pub destination: PathBuf,

    /// Maximum number of entries moved at once
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
