//! CLI parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "news-relay-bot")]
#[command(about = "Relay topic-relevant channel posts into one Telegram channel", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the relay until SIGINT/SIGTERM (default).
    Run,
    /// Validate the configured source channels and exit.
    Check,
    /// Classify one text against the configured topics and print the verdict.
    Classify {
        /// Text to classify.
        text: String,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::parse_from(["news-relay-bot"]);
        assert_eq!(cli.command(), Commands::Run);
        assert_eq!(cli.config, PathBuf::from("config.json"));
    }

    #[test]
    fn test_classify_with_config() {
        let cli = Cli::parse_from(["news-relay-bot", "classify", "--config", "/etc/relay.json", "Новости"]);
        assert_eq!(
            cli.command(),
            Commands::Classify {
                text: "Новости".to_string()
            }
        );
        assert_eq!(cli.config, PathBuf::from("/etc/relay.json"));
    }
}
