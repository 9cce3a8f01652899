//! Assembly: builds the pipeline from config and runs the execution contexts. Used by the facade.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use classifier_client::OllamaClassifier;
use relay_core::ChannelRef;
use relay_pipeline::{
    validate_channels, CaptionFormatter, ContentResolver, MonitoredChannels, RelayDispatcher,
    RelayPipeline, RelayQueue, RelayStats,
};
use relay_telegram::{
    combined_handler, command_branch, ingest_branch, run_dispatcher, TelegramConfig,
    TelegramDestination, TelegramDirectory, TelegramMediaFetcher,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::RelayConfig;

/// Builds the relay pipeline: Ollama classifier, Telegram fetcher and destination.
pub(crate) fn build_pipeline(
    config: &RelayConfig,
    telegram: &TelegramConfig,
    stats: Arc<RelayStats>,
) -> Result<RelayPipeline> {
    let classifier = Arc::new(OllamaClassifier::new(&config.classifier_config())?);

    let reupload = config.media_mode.reupload(telegram.same_identity());
    info!(
        same_identity = telegram.same_identity(),
        reupload,
        "Media relay strategy selected"
    );

    let resolver = ContentResolver::new(
        Arc::new(TelegramMediaFetcher::new(telegram.ingest_bot())),
        reupload,
    );
    let dispatcher = RelayDispatcher::new(
        Arc::new(TelegramDestination::new(
            telegram.posting_bot(),
            telegram.destination_recipient(),
        )),
        CaptionFormatter::new(config.language),
    );

    Ok(RelayPipeline::new(
        classifier,
        Arc::new(config.interest_profile()),
        resolver,
        dispatcher,
        stats,
    ))
}

/// Validates channels unless shutdown comes first. `None` means ingestion must not start.
async fn monitored_channels(
    telegram: &TelegramConfig,
    channels: &[ChannelRef],
    stats: &RelayStats,
    cancel: &CancellationToken,
) -> Option<Arc<MonitoredChannels>> {
    let directory = TelegramDirectory::new(telegram.ingest_bot());
    let report = tokio::select! {
        _ = cancel.cancelled() => return None,
        report = validate_channels(&directory, channels) => report,
    };
    match report {
        Ok(report) => {
            stats.set_monitored_channels(report.monitored.len());
            Some(Arc::new(report.monitored))
        }
        Err(e) => {
            error!(error = %e, "Event ingestion not started");
            None
        }
    }
}

/// Event context for a separate ingesting bot: validate, then receive channel posts until cancelled.
pub(crate) async fn run_event_context(
    telegram: TelegramConfig,
    channels: Vec<ChannelRef>,
    queue: Arc<RelayQueue>,
    stats: Arc<RelayStats>,
    cancel: CancellationToken,
) {
    if let Some(monitored) = monitored_channels(&telegram, &channels, &stats, &cancel).await {
        run_dispatcher(
            telegram.ingest_bot(),
            ingest_branch(monitored, queue.clone()),
            cancel,
            "events",
        )
        .await;
    }
    queue.shutdown().await;
}

/// Polling context for the posting bot: operator commands only.
pub(crate) async fn run_command_context(
    telegram: TelegramConfig,
    stats: Arc<RelayStats>,
    cancel: CancellationToken,
) {
    run_dispatcher(telegram.posting_bot(), command_branch(stats), cancel, "commands").await;
}

/// One token for both identities: the Bot API allows a single long poll, so both branches share
/// one dispatcher. Without valid channels the command branch keeps running alone.
pub(crate) async fn run_shared_context(
    telegram: TelegramConfig,
    channels: Vec<ChannelRef>,
    queue: Arc<RelayQueue>,
    stats: Arc<RelayStats>,
    cancel: CancellationToken,
) {
    let handler = match monitored_channels(&telegram, &channels, &stats, &cancel).await {
        Some(monitored) => combined_handler(monitored, queue.clone(), stats.clone()),
        None if cancel.is_cancelled() => return,
        None => command_branch(stats.clone()),
    };
    run_dispatcher(telegram.posting_bot(), handler, cancel, "relay").await;
    queue.shutdown().await;
}

/// Logs relay counters every `period` until cancelled.
pub async fn heartbeat(stats: Arc<RelayStats>, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    // First tick completes immediately.
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                info!(stats = %stats.snapshot(), "Heartbeat");
            }
        }
    }
}
