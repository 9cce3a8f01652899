//! Telegram connectivity config: posting/ingest tokens, optional Bot API URL, destination channel.

use relay_core::ChannelRef;
use teloxide::types::Recipient;
use tracing::error;

use crate::directory::recipient;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Posting identity: writes to the destination and answers operator commands.
    pub bot_token: String,
    /// Ingesting identity; `None` means the posting bot also receives channel posts.
    pub ingest_bot_token: Option<String>,
    /// Custom or local Bot API server.
    pub telegram_api_url: Option<String>,
    pub destination: ChannelRef,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, destination: ChannelRef) -> Self {
        Self {
            bot_token: bot_token.into(),
            ingest_bot_token: None,
            telegram_api_url: None,
            destination,
        }
    }

    pub fn with_ingest_token(mut self, token: impl Into<String>) -> Self {
        self.ingest_bot_token = Some(token.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.telegram_api_url = Some(url.into());
        self
    }

    pub fn ingest_token(&self) -> &str {
        self.ingest_bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.bot_token)
    }

    /// True when one bot both receives posts and writes to the destination.
    pub fn same_identity(&self) -> bool {
        self.ingest_token() == self.bot_token
    }

    pub fn destination_recipient(&self) -> Recipient {
        recipient(&self.destination)
    }

    pub fn posting_bot(&self) -> teloxide::Bot {
        self.build_bot(&self.bot_token)
    }

    pub fn ingest_bot(&self) -> teloxide::Bot {
        self.build_bot(self.ingest_token())
    }

    fn build_bot(&self, token: &str) -> teloxide::Bot {
        let bot = teloxide::Bot::new(token);
        if let Some(ref url_str) = self.telegram_api_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_token_defaults_to_posting_token() {
        let config = TelegramConfig::new("123:abc", ChannelRef::Id(-100500));
        assert_eq!(config.ingest_token(), "123:abc");
        assert!(config.same_identity());

        let config = config.with_ingest_token("456:def");
        assert_eq!(config.ingest_token(), "456:def");
        assert!(!config.same_identity());
    }

    #[test]
    fn test_destination_recipient() {
        let config = TelegramConfig::new("t", ChannelRef::parse("@digest"));
        assert_eq!(
            config.destination_recipient(),
            Recipient::ChannelUsername("@digest".to_string())
        );
    }

    #[test]
    fn test_api_url_applied() {
        let config =
            TelegramConfig::new("t", ChannelRef::Id(-1)).with_api_url("http://localhost:8081/");
        assert_eq!(config.posting_bot().api_url().as_str(), "http://localhost:8081/");
    }
}
