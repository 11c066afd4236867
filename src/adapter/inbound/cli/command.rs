//! Command-line interface definitions.
//!
//! Defines the CLI structure for the riskboard application using `clap`.
//! `serve` runs both HTTP services under the supervisor; the remaining
//! subcommands run a single service or inspect the stored data.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TradingView webhook receiver and exit-price dashboard
#[derive(Parser, Debug)]
#[command(name = "riskboard")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the riskboard CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the webhook receiver and the dashboard under the supervisor
    Serve(ConfigPathArg),

    /// Run only the webhook receiver
    Webhook(ConfigPathArg),

    /// Run only the dashboard
    Dashboard(ConfigPathArg),

    /// Show the latest quote per symbol
    Latest(ConfigPathArg),

    /// Show stored quotes, newest first
    History(HistoryArgs),

    /// Export the latest quote per symbol as CSV
    Export(ExportArgs),

    /// Create or upgrade the database schema
    Migrate(ConfigPathArg),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `riskboard config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, env = "RISKBOARD_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Maximum number of rows to show (0 shows all).
    #[arg(short, long, default_value = "50")]
    pub limit: u32,
}

/// Arguments for the `export` subcommand.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Output file path (writes to stdout if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
