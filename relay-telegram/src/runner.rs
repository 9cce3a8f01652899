//! Dispatcher wiring: channel-post ingestion branch, operator command branch, and a runner that
//! stops when the shared cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use relay_core::ToInbound;
use relay_pipeline::{MonitoredChannels, RelayQueue, RelayStats};
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::RequestError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::adapters::TelegramMessageWrapper;
use crate::commands::{reply_for, Command};

const SHUTDOWN_RETRY: Duration = Duration::from_millis(100);

/// Channel posts from monitored chats go to the relay queue; the update task never relays itself.
pub fn ingest_branch(
    monitored: Arc<MonitoredChannels>,
    queue: Arc<RelayQueue>,
) -> UpdateHandler<RequestError> {
    Update::filter_channel_post().endpoint(move |msg: Message| {
        let monitored = monitored.clone();
        let queue = queue.clone();
        async move {
            if !monitored.contains(msg.chat.id.0) {
                debug!(chat_id = msg.chat.id.0, "Post from unmonitored chat ignored");
                return respond(());
            }
            let inbound = TelegramMessageWrapper(&msg).to_inbound();
            info!(
                channel_id = inbound.channel.id,
                message_id = inbound.id,
                "Received channel post"
            );
            queue.submit(inbound);
            respond(())
        }
    })
}

/// `/help`, `/status`, `/ping` for the posting bot.
pub fn command_branch(stats: Arc<RelayStats>) -> UpdateHandler<RequestError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
            let stats = stats.clone();
            async move {
                info!(chat_id = msg.chat.id.0, command = ?cmd, "Operator command");
                bot.send_message(msg.chat.id, reply_for(&cmd, &stats))
                    .await?;
                respond(())
            }
        })
}

/// Both branches on one dispatcher, for when one token serves ingestion and posting.
pub fn combined_handler(
    monitored: Arc<MonitoredChannels>,
    queue: Arc<RelayQueue>,
    stats: Arc<RelayStats>,
) -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(ingest_branch(monitored, queue))
        .branch(command_branch(stats))
}

/// Runs a long-polling dispatcher until `cancel` fires.
#[instrument(skip(bot, handler, cancel))]
pub async fn run_dispatcher(
    bot: Bot,
    handler: UpdateHandler<RequestError>,
    cancel: CancellationToken,
    context: &'static str,
) {
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(format!(
            "Error in {} dispatcher",
            context
        )))
        .build();

    let token = dispatcher.shutdown_token();
    let watcher = tokio::spawn(async move {
        cancel.cancelled().await;
        // shutdown() fails while the dispatcher is still starting; retry until it is running.
        loop {
            match token.shutdown() {
                Ok(done) => {
                    done.await;
                    break;
                }
                Err(_) => tokio::time::sleep(SHUTDOWN_RETRY).await,
            }
        }
    });

    info!(context, "Dispatcher started");
    dispatcher.dispatch().await;
    watcher.abort();
    info!(context, "Dispatcher stopped");
}
