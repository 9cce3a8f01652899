//! **Public API of this crate:** `run_relay`, `check_channels`, `classify_once`.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use classifier_client::OllamaClassifier;
use relay_pipeline::{validate_channels, RelayQueue, RelayStats, ValidationReport};
use relay_telegram::TelegramDirectory;
use tracing::info;

use crate::assembly;
use crate::config::RelayConfig;
use crate::lifecycle::Lifecycle;

/// Runs the relay until a termination signal, then stops both contexts within the grace period.
pub async fn run_relay(config: RelayConfig) -> Result<()> {
    config.log_summary();

    let telegram = config.telegram_config();
    let stats = Arc::new(RelayStats::new());
    let pipeline = Arc::new(assembly::build_pipeline(&config, &telegram, stats.clone())?);

    let lifecycle = Lifecycle::new(config.shutdown_grace());
    let cancel = lifecycle.token();
    lifecycle.install_signal_handlers();

    let queue = Arc::new(RelayQueue::new(
        pipeline,
        config.max_concurrent_relays,
        cancel.clone(),
    ));
    let channels = config.channels_to_monitor.clone();

    let mut contexts = Vec::new();
    if telegram.same_identity() {
        info!("Ingesting and posting with one bot, sharing a single dispatcher");
        contexts.push((
            "relay",
            tokio::spawn(assembly::run_shared_context(
                telegram,
                channels,
                queue,
                stats.clone(),
                cancel.clone(),
            )),
        ));
    } else {
        contexts.push((
            "events",
            tokio::spawn(assembly::run_event_context(
                telegram.clone(),
                channels,
                queue,
                stats.clone(),
                cancel.clone(),
            )),
        ));
        contexts.push((
            "commands",
            tokio::spawn(assembly::run_command_context(
                telegram,
                stats.clone(),
                cancel.clone(),
            )),
        ));
    }
    contexts.push((
        "heartbeat",
        tokio::spawn(assembly::heartbeat(
            stats,
            config.check_interval(),
            cancel.clone(),
        )),
    ));

    lifecycle.run(contexts).await;
    Ok(())
}

/// Validates the configured channels with the ingesting bot and prints the result.
pub async fn check_channels(config: &RelayConfig) -> Result<ValidationReport> {
    let directory = TelegramDirectory::new(config.telegram_config().ingest_bot());
    let report = validate_channels(&directory, &config.channels_to_monitor).await?;

    for channel in report.monitored.iter() {
        let name = channel
            .username
            .as_deref()
            .map(|u| format!("@{}", u))
            .unwrap_or_default();
        println!("ok       {} {}", channel.id, name);
    }
    for (channel, error) in &report.rejected {
        println!("invalid  {} ({})", channel, error);
    }
    println!(
        "{} of {} channels will be monitored",
        report.monitored.len(),
        report.monitored.len() + report.rejected.len()
    );
    Ok(report)
}

/// Sends one classification request and prints the verdict.
pub async fn classify_once(config: &RelayConfig, text: &str) -> Result<bool> {
    if text.trim().is_empty() {
        return Err(anyhow!("Text to classify must not be empty"));
    }
    let classifier = OllamaClassifier::new(&config.classifier_config())?;
    let verdict = classifier
        .try_classify(text, &config.interest_profile())
        .await?;
    println!("{}", if verdict { "relevant" } else { "not relevant" });
    Ok(verdict)
}
