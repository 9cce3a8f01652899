//! JSON configuration file, read once at startup.
//!
//! Keys use the SCREAMING_SNAKE_CASE names of the deployed `config.json`. Any failure here is
//! fatal: the binary prints the error and exits with status 1.

use std::path::Path;
use std::time::Duration;

use classifier_client::{ClassifierConfig, InterestProfile};
use relay_core::{mask_token, ChannelRef, ConfigError, Locale, MediaMode};
use relay_telegram::TelegramConfig;
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

const LOG_LEVELS: [&str; 8] = [
    "TRACE", "DEBUG", "INFO", "WARN", "WARNING", "ERROR", "CRITICAL", "FATAL",
];

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(i64),
    Text(String),
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::Number(n) => n.to_string(),
            StringOrNumber::Text(s) => s,
        }),
    )
}

fn default_check_interval() -> u64 {
    300
}
fn default_log_level() -> String {
    "INFO".to_string()
}
fn default_log_file() -> String {
    "bot.log".to_string()
}
fn default_true() -> bool {
    true
}
fn default_classifier_timeout() -> u64 {
    60
}
fn default_max_concurrent_relays() -> usize {
    4
}
fn default_shutdown_grace() -> u64 {
    2
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RelayConfig {
    pub telegram_bot_token: String,
    pub summary_channel_id: ChannelRef,
    /// User-account credentials kept from older deployments. Ingestion runs on the Bot API, so
    /// they are checked when present and otherwise unused.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub api_id: Option<String>,
    #[serde(default)]
    pub api_hash: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub phone_number: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub interest_topics: Vec<String>,
    pub channels_to_monitor: Vec<ChannelRef>,

    /// Heartbeat period in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default)]
    pub language: Locale,
    #[serde(default = "default_true")]
    pub exclude_promotional: bool,
    #[serde(default = "default_classifier_timeout")]
    pub classifier_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_relays")]
    pub max_concurrent_relays: usize,
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
    #[serde(default)]
    pub media_mode: MediaMode,
    #[serde(default)]
    pub ingest_bot_token: Option<String>,
    #[serde(default)]
    pub telegram_api_url: Option<String>,
}

impl RelayConfig {
    /// Reads, parses and validates the file. `TELEGRAM_API_URL` from the environment is used when
    /// the file does not set it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let mut config = Self::from_json(&raw).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: display.clone(),
                message,
            },
            other => other,
        })?;
        if config.telegram_api_url.is_none() {
            config.telegram_api_url = std::env::var("TELEGRAM_API_URL")
                .ok()
                .filter(|s| !s.trim().is_empty());
        }
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: RelayConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        self.interest_topics = self
            .interest_topics
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self.log_level = self.log_level.trim().to_uppercase();
        self.ingest_bot_token = self
            .ingest_bot_token
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(key: &'static str, message: &str) -> ConfigError {
            ConfigError::Invalid {
                key,
                message: message.to_string(),
            }
        }

        if self.telegram_bot_token.trim().is_empty() {
            return Err(invalid("TELEGRAM_BOT_TOKEN", "must not be empty"));
        }
        if self.summary_channel_id.is_blank() {
            return Err(invalid("SUMMARY_CHANNEL_ID", "must be a chat id or @handle"));
        }
        if let Some(api_id) = &self.api_id {
            if api_id.trim().parse::<i64>().map_or(true, |id| id <= 0) {
                return Err(invalid("API_ID", "must be a positive integer"));
            }
        }
        if self.api_hash.as_deref().is_some_and(|h| h.trim().is_empty()) {
            return Err(invalid("API_HASH", "must not be empty"));
        }
        if self.phone_number.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(invalid("PHONE_NUMBER", "must not be empty"));
        }
        match reqwest::Url::parse(&self.ollama_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(invalid("OLLAMA_URL", "must be an http(s) URL")),
        }
        if self.ollama_model.trim().is_empty() {
            return Err(invalid("OLLAMA_MODEL", "must not be empty"));
        }
        if self.interest_topics.is_empty() {
            return Err(invalid("INTEREST_TOPICS", "must list at least one topic"));
        }
        if self.channels_to_monitor.is_empty() {
            return Err(invalid("CHANNELS_TO_MONITOR", "must list at least one channel"));
        }
        if self.check_interval == 0 {
            return Err(invalid("CHECK_INTERVAL", "must be greater than zero"));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(invalid(
                "LOG_LEVEL",
                "must be one of TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL",
            ));
        }
        if self.classifier_timeout_secs == 0 {
            return Err(invalid("CLASSIFIER_TIMEOUT_SECS", "must be greater than zero"));
        }
        if self.max_concurrent_relays == 0 {
            return Err(invalid("MAX_CONCURRENT_RELAYS", "must be greater than zero"));
        }
        if let Some(url) = &self.telegram_api_url {
            if reqwest::Url::parse(url).is_err() {
                return Err(invalid("TELEGRAM_API_URL", "must be a valid URL"));
            }
        }
        Ok(())
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::new(self.ollama_url.clone(), self.ollama_model.clone())
            .with_timeout(Duration::from_secs(self.classifier_timeout_secs))
            .with_locale(self.language)
    }

    pub fn interest_profile(&self) -> InterestProfile {
        InterestProfile::new(self.interest_topics.clone())
            .with_exclude_promotional(self.exclude_promotional)
    }

    pub fn telegram_config(&self) -> TelegramConfig {
        let mut config =
            TelegramConfig::new(self.telegram_bot_token.clone(), self.summary_channel_id.clone());
        if let Some(token) = &self.ingest_bot_token {
            config = config.with_ingest_token(token.clone());
        }
        if let Some(url) = &self.telegram_api_url {
            config = config.with_api_url(url.clone());
        }
        config
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Logs the effective configuration with secrets masked.
    pub fn log_summary(&self) {
        info!(
            bot_token = %mask_token(&self.telegram_bot_token),
            ingest_bot_token = %self.ingest_bot_token.as_deref().map(mask_token).unwrap_or_else(|| "<same>".to_string()),
            api_id = ?self.api_id,
            api_hash = ?self.api_hash.as_deref().map(mask_token),
            phone_number = ?self.phone_number.as_deref().map(mask_token),
            destination = %self.summary_channel_id,
            channels = self.channels_to_monitor.len(),
            topics = %self.interest_topics.join(", "),
            ollama_url = %self.ollama_url,
            ollama_model = %self.ollama_model,
            language = %self.language,
            media_mode = ?self.media_mode,
            check_interval = self.check_interval,
            "Configuration loaded"
        );
    }
}
