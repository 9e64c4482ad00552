//! Caishen CLI application.

mod cli;

use anyhow::Result;
use caishen_config::{load_config, AppConfig, SettingsError};
use caishen_monitor::setup_logging;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config);

    // The log file and format come from the config file when it loads;
    // the level and --json-logs always come from the command line.
    let logging = loaded.as_ref().ok().map(|config| &config.logging);
    let json = cli.json_logs || logging.is_some_and(|l| l.is_json());
    let log_file = logging.and_then(|l| l.file.as_ref()).map(PathBuf::from);
    let _guard = setup_logging(cli.log_level.as_str(), json, log_file.as_deref());

    match cli.command {
        Commands::Compute(args) => cli::commands::compute::run(args, &or_default(loaded)).await,
        Commands::Indicators => cli::commands::indicators::run().await,
        Commands::Request(args) => cli::commands::request::run(args, &or_default(loaded).vendor),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded),
    }
}

fn or_default(loaded: Result<AppConfig, SettingsError>) -> AppConfig {
    loaded.unwrap_or_else(|e| {
        warn!("Using default configuration: {}", e);
        AppConfig::default()
    })
}
