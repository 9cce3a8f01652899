//! Tests for loading `config.json`.

use std::io::Write;
use std::time::Duration;

use news_relay_bot::RelayConfig;
use relay_core::{ChannelRef, ConfigError, Locale, MediaMode};
use serial_test::serial;
use tempfile::NamedTempFile;

const VALID: &str = r#"{
    "TELEGRAM_BOT_TOKEN": "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw",
    "SUMMARY_CHANNEL_ID": "@ai_digest",
    "API_ID": 12345,
    "API_HASH": "0123456789abcdef0123456789abcdef",
    "PHONE_NUMBER": "+70000000000",
    "OLLAMA_URL": "http://localhost:11434",
    "OLLAMA_MODEL": "llama3",
    "INTEREST_TOPICS": ["AI", " машинное обучение ", ""],
    "CHANNELS_TO_MONITOR": ["@tech_news", "https://t.me/ml_daily", -1001234567890, "-1009876543210"]
}"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn with_field(key: &str, value: &str) -> String {
    let mut json: serde_json::Value = serde_json::from_str(VALID).unwrap();
    json[key] = serde_json::from_str(value).unwrap();
    json.to_string()
}

fn without_field(key: &str) -> String {
    let mut json: serde_json::Value = serde_json::from_str(VALID).unwrap();
    json.as_object_mut().unwrap().remove(key);
    json.to_string()
}

/// **Test: A minimal valid file loads with defaults for every optional key.**
///
/// **Setup:** Required keys only.
///
/// **Expected:** Defaults applied; topics trimmed and blanks dropped; channel refs parsed.
#[test]
#[serial]
fn test_load_valid_config_with_defaults() {
    std::env::remove_var("TELEGRAM_API_URL");
    let file = write_config(VALID);

    let config = RelayConfig::load(file.path()).unwrap();

    assert_eq!(config.api_id.as_deref(), Some("12345"));
    assert_eq!(config.interest_topics, vec!["AI", "машинное обучение"]);
    assert_eq!(
        config.channels_to_monitor,
        vec![
            ChannelRef::Username("tech_news".to_string()),
            ChannelRef::Username("ml_daily".to_string()),
            ChannelRef::Id(-1001234567890),
            ChannelRef::Id(-1009876543210),
        ]
    );
    assert_eq!(config.summary_channel_id, ChannelRef::Username("ai_digest".to_string()));
    assert_eq!(config.check_interval(), Duration::from_secs(300));
    assert_eq!(config.log_level, "INFO");
    assert_eq!(config.log_file, "bot.log");
    assert_eq!(config.language, Locale::Ru);
    assert!(config.exclude_promotional);
    assert_eq!(config.media_mode, MediaMode::Auto);
    assert_eq!(config.max_concurrent_relays, 4);
    assert_eq!(config.shutdown_grace(), Duration::from_secs(2));
    assert!(config.ingest_bot_token.is_none());
    assert!(config.telegram_api_url.is_none());
}

/// **Test: Optional keys override defaults.**
#[test]
fn test_optional_keys_override_defaults() {
    let mut json: serde_json::Value = serde_json::from_str(VALID).unwrap();
    json["LANGUAGE"] = "EN".into();
    json["MEDIA_MODE"] = "reupload".into();
    json["LOG_LEVEL"] = "warning".into();
    json["INGEST_BOT_TOKEN"] = "987654321:BBHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw".into();
    json["EXCLUDE_PROMOTIONAL"] = false.into();

    let config = RelayConfig::from_json(&json.to_string()).unwrap();

    assert_eq!(config.language, Locale::En);
    assert_eq!(config.media_mode, MediaMode::Reupload);
    assert_eq!(config.log_level, "WARNING");
    assert!(!config.exclude_promotional);
    assert!(!config.telegram_config().same_identity());
    assert!(!config.interest_profile().exclude_promotional);
}

/// **Test: User-account credentials are optional.**
///
/// **Setup:** `API_ID`, `API_HASH` and `PHONE_NUMBER` removed.
///
/// **Expected:** The config loads; a present but blank `API_HASH` is still rejected.
#[test]
fn test_account_credentials_optional() {
    let mut json: serde_json::Value = serde_json::from_str(VALID).unwrap();
    let fields = json.as_object_mut().unwrap();
    for key in ["API_ID", "API_HASH", "PHONE_NUMBER"] {
        fields.remove(key);
    }

    let config = RelayConfig::from_json(&json.to_string()).unwrap();
    assert!(config.api_id.is_none());
    assert!(config.api_hash.is_none());
    assert!(config.phone_number.is_none());

    let err = RelayConfig::from_json(&with_field("API_HASH", r#""  ""#)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "API_HASH", .. }));
}

/// **Test: A missing required key is a parse error naming the key.**
#[test]
fn test_missing_required_key() {
    let file = write_config(&without_field("OLLAMA_MODEL"));

    let err = RelayConfig::load(file.path()).unwrap_err();

    match err {
        ConfigError::Parse { path, message } => {
            assert_eq!(path, file.path().display().to_string());
            assert!(message.contains("OLLAMA_MODEL"), "message: {}", message);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

/// **Test: Malformed JSON is a parse error.**
#[test]
fn test_malformed_json() {
    let file = write_config("{ \"TELEGRAM_BOT_TOKEN\": ");

    assert!(matches!(
        RelayConfig::load(file.path()),
        Err(ConfigError::Parse { .. })
    ));
}

/// **Test: A missing file is a read error.**
#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = RelayConfig::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}

/// **Test: Values that parse but make no sense are rejected with their key.**
#[test]
fn test_invalid_values_name_their_key() {
    let cases = [
        ("INTEREST_TOPICS", r#"["  ", ""]"#, "INTEREST_TOPICS"),
        ("CHANNELS_TO_MONITOR", "[]", "CHANNELS_TO_MONITOR"),
        ("TELEGRAM_BOT_TOKEN", r#""""#, "TELEGRAM_BOT_TOKEN"),
        ("SUMMARY_CHANNEL_ID", r#""@""#, "SUMMARY_CHANNEL_ID"),
        ("API_ID", r#""abc""#, "API_ID"),
        ("OLLAMA_URL", r#""localhost:11434""#, "OLLAMA_URL"),
        ("LOG_LEVEL", r#""LOUD""#, "LOG_LEVEL"),
        ("CHECK_INTERVAL", "0", "CHECK_INTERVAL"),
    ];

    for (field, value, expected_key) in cases {
        let err = RelayConfig::from_json(&with_field(field, value)).unwrap_err();
        match err {
            ConfigError::Invalid { key, .. } => assert_eq!(key, expected_key),
            other => panic!("{}: expected invalid value, got {:?}", field, other),
        }
    }
}

/// **Test: TELEGRAM_API_URL from the environment applies only when the file leaves it unset.**
#[test]
#[serial]
fn test_api_url_from_environment() {
    std::env::set_var("TELEGRAM_API_URL", "http://127.0.0.1:8081");

    let from_env = RelayConfig::load(write_config(VALID).path()).unwrap();
    let from_file = RelayConfig::load(
        write_config(&with_field("TELEGRAM_API_URL", r#""http://bot-api:8081""#)).path(),
    )
    .unwrap();

    std::env::remove_var("TELEGRAM_API_URL");

    assert_eq!(
        from_env.telegram_api_url.as_deref(),
        Some("http://127.0.0.1:8081")
    );
    assert_eq!(
        from_file.telegram_api_url.as_deref(),
        Some("http://bot-api:8081")
    );
}
