//! CLI module graph and shared helpers.

pub mod command;
pub mod config;
pub mod diagnostic;
pub mod migrate;
pub mod output;
pub mod quotes;
pub mod run;

use std::path::Path;

use tokio::sync::watch;

use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::settings::Config;
use command::{Commands, ConfigCommand};

/// Load the configuration at `path`, falling back to defaults when the file
/// does not exist. Syntax errors are rendered with source context.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or is invalid.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Config::load_or_default(path);
    }
    load_existing(path)
}

/// Load the configuration at `path`, which must exist.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or invalid.
pub fn load_existing(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
    Config::parse_toml(&content).inspect_err(|e| {
        if let Error::Config(ConfigError::Parse(parse)) = e {
            if !output::is_json() {
                diagnostic::print(diagnostic::ConfigDiagnostic::from_toml(path, &content, parse));
            }
        }
    })
}

/// Dispatch a parsed command.
///
/// # Errors
///
/// Returns the first error raised by the command handler.
pub async fn execute(command: Commands, shutdown: watch::Receiver<bool>) -> Result<()> {
    match command {
        Commands::Serve(args) => run::execute_serve(&args.config, shutdown).await,
        Commands::Webhook(args) => run::execute_webhook(&args.config, shutdown).await,
        Commands::Dashboard(args) => run::execute_dashboard(&args.config, shutdown).await,
        Commands::Latest(args) => quotes::execute_latest(&args.config).await,
        Commands::History(args) => quotes::execute_history(&args.config.config, args.limit).await,
        Commands::Export(args) => {
            quotes::execute_export(&args.config.config, args.output.as_deref()).await
        }
        Commands::Migrate(args) => migrate::execute(&args.config),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    }
}
