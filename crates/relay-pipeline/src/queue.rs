//! Per-channel FIFO relay queues.
//!
//! Each source channel gets one worker task, so posts of a channel are relayed in arrival order.
//! A shared semaphore bounds concurrent relays across channels. Outbound calls never run on the
//! task that receives updates.

use std::sync::Arc;

use dashmap::DashMap;
use relay_core::InboundMessage;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::pipeline::RelayPipeline;

struct Worker {
    tx: mpsc::UnboundedSender<InboundMessage>,
    handle: JoinHandle<()>,
}

pub struct RelayQueue {
    pipeline: Arc<RelayPipeline>,
    permits: Arc<Semaphore>,
    workers: DashMap<i64, Worker>,
    cancel: CancellationToken,
}

impl RelayQueue {
    pub fn new(
        pipeline: Arc<RelayPipeline>,
        max_concurrent: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            workers: DashMap::new(),
            cancel,
        }
    }

    /// Enqueues a post on its channel's worker. Returns `false` once shutdown has begun.
    pub fn submit(&self, message: InboundMessage) -> bool {
        if self.cancel.is_cancelled() {
            debug!(
                channel_id = message.channel.id,
                message_id = message.id,
                "Shutting down, post dropped"
            );
            return false;
        }
        let channel_id = message.channel.id;
        let tx = self
            .workers
            .entry(channel_id)
            .or_insert_with(|| self.spawn_worker(channel_id))
            .tx
            .clone();
        match tx.send(message) {
            Ok(()) => true,
            Err(e) => {
                warn!(channel_id, message_id = e.0.id, "Relay worker gone, post dropped");
                self.workers.remove(&channel_id);
                false
            }
        }
    }

    pub fn active_channels(&self) -> usize {
        self.workers.len()
    }

    fn spawn_worker(&self, channel_id: i64) -> Worker {
        let (tx, mut rx) = mpsc::unbounded_channel::<InboundMessage>();
        let pipeline = self.pipeline.clone();
        let permits = self.permits.clone();
        let cancel = self.cancel.clone();

        let handle = tokio::spawn(async move {
            debug!(channel_id, "Relay worker started");
            loop {
                let message = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = rx.recv() => match next {
                        Some(message) => message,
                        None => break,
                    },
                };
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    permit = permits.clone().acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => break,
                    },
                };
                pipeline.handle(message).await;
                drop(permit);
            }
            debug!(channel_id, "Relay worker stopped");
        });

        Worker { tx, handle }
    }

    /// Closes every queue and waits for the workers. Without cancellation workers drain what is
    /// already queued; after cancellation they stop at the next post boundary.
    pub async fn shutdown(&self) {
        let channel_ids: Vec<i64> = self.workers.iter().map(|entry| *entry.key()).collect();
        let mut handles = Vec::with_capacity(channel_ids.len());
        for channel_id in channel_ids {
            if let Some((_, worker)) = self.workers.remove(&channel_id) {
                drop(worker.tx);
                handles.push((channel_id, worker.handle));
            }
        }
        for (channel_id, handle) in handles {
            if let Err(e) = handle.await {
                warn!(channel_id, error = %e, "Relay worker ended abnormally");
            }
        }
    }
}
