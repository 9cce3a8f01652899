//! Tracing initialization: one fmt layer teed to stdout and the append-mode log file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Maps a configured level name (`INFO`, `WARNING`, `CRITICAL`, ...) to a filter directive.
/// Unknown names fall back to `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" | "FATAL" => "error",
        _ => "info",
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `INFO`) is used. Load `.env`
/// before calling so `RUST_LOG` from it takes effect.
pub fn init_tracing(log_file_path: &str, default_level: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(default_level)));

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let writer = io::stdout.and(file);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_accepts_config_names() {
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("warning"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("verbose"), "info");
    }

    #[test]
    fn test_init_tracing_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bot.log");

        init_tracing(path.to_str().unwrap(), "DEBUG").unwrap();
        tracing::info!("Logger ready");

        assert!(path.exists());
        assert!(init_tracing(path.to_str().unwrap(), "DEBUG").is_err());
    }
}
