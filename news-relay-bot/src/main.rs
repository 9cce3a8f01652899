//! news-relay-bot: entry point. Loads `.env`, parses the CLI, reads the JSON config and runs the command.

use std::process::ExitCode;

use clap::Parser;
use news_relay_bot::{check_channels, classify_once, run_relay, Cli, Commands, RelayConfig};
use relay_core::init_tracing;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match RelayConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = init_tracing(&config.log_file, &config.log_level) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::from(1);
    }

    let result = match cli.command() {
        Commands::Run => run_relay(config).await,
        Commands::Check => check_channels(&config).await.map(|_| ()),
        Commands::Classify { text } => classify_once(&config, &text).await.map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
