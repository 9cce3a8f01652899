//! Operator commands answered by the posting bot.

use relay_pipeline::RelayStats;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show this text")]
    Help,
    #[command(description = "show relay counters")]
    Status,
    #[command(description = "check that the bot is alive")]
    Ping,
}

/// Reply text for a command.
pub fn reply_for(command: &Command, stats: &RelayStats) -> String {
    match command {
        Command::Help => Command::descriptions().to_string(),
        Command::Status => {
            let s = stats.snapshot();
            format!(
                "Monitored channels: {}\nReceived: {}\nDelivered: {}\nFallback: {}\nNot relevant: {}\nSuppressed: {}",
                s.monitored_channels, s.received, s.delivered, s.fallback, s.not_relevant, s.suppressed
            )
        }
        Command::Ping => "pong".to_string(),
    }
}
