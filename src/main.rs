//! Ring-Con driver
//!
//! Main entry point: logging, config and command dispatch.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::run::RunOptions;
use ringcon_driver::DriverConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.unwrap_or_else(DriverConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let config = DriverConfig::load(&config_path)?;

    match cli.command.unwrap_or_default() {
        Commands::Run => {
            commands::run::run(RunOptions::new(&config, cli.dry_run, cli.timeout_ms)).await
        }
        Commands::List => commands::utility::list(),
        Commands::InitConfig => commands::utility::init_config(&config, &config_path),
    }
}
