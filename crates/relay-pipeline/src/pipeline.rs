//! One inbound post through relevance, resolution, attribution and delivery.

use std::sync::Arc;

use classifier_client::{InterestProfile, RelevanceClassifier};
use relay_core::{DeliveryOutcome, InboundMessage, RelayError};
use tracing::{debug, error, info};

use crate::attribution::attribute;
use crate::dispatcher::RelayDispatcher;
use crate::resolver::{content_kind, ContentResolver};
use crate::stats::RelayStats;

pub struct RelayPipeline {
    classifier: Arc<dyn RelevanceClassifier>,
    profile: Arc<InterestProfile>,
    resolver: ContentResolver,
    dispatcher: RelayDispatcher,
    stats: Arc<RelayStats>,
}

impl RelayPipeline {
    pub fn new(
        classifier: Arc<dyn RelevanceClassifier>,
        profile: Arc<InterestProfile>,
        resolver: ContentResolver,
        dispatcher: RelayDispatcher,
        stats: Arc<RelayStats>,
    ) -> Self {
        Self {
            classifier,
            profile,
            resolver,
            dispatcher,
            stats,
        }
    }

    pub fn stats(&self) -> &Arc<RelayStats> {
        &self.stats
    }

    /// Relevance verdict. A post without text is vacuously relevant and never sent to the classifier.
    pub async fn is_relevant(&self, message: &InboundMessage) -> bool {
        match message.body() {
            Some(text) => self.classifier.classify(text, &self.profile).await,
            None => true,
        }
    }

    /// Classifies first so irrelevant media is never downloaded.
    pub async fn process(&self, message: &InboundMessage) -> Result<DeliveryOutcome, RelayError> {
        if !self.is_relevant(message).await {
            return Ok(DeliveryOutcome::NotRelevant);
        }

        let attribution = attribute(&message.channel, message.id);
        let body = message.caption_source();

        match self.resolver.resolve(message).await {
            Ok(content) => self.dispatcher.relay(content, body, &attribution, true).await,
            Err(e) => {
                self.dispatcher
                    .degrade(content_kind(message), e.to_string(), body, &attribution)
                    .await
            }
        }
    }

    /// Per-message boundary: runs [`process`](Self::process), logs the result and updates counters.
    /// Never propagates an error.
    pub async fn handle(&self, message: InboundMessage) {
        self.stats.record_received();
        let kind = content_kind(&message);
        info!(
            channel_id = message.channel.id,
            message_id = message.id,
            kind = %kind,
            "New post"
        );

        match self.process(&message).await {
            Ok(outcome) => {
                self.stats.record_outcome(outcome);
                if outcome == DeliveryOutcome::NotRelevant {
                    debug!(
                        channel_id = message.channel.id,
                        message_id = message.id,
                        outcome = %outcome,
                        "Post skipped"
                    );
                } else {
                    info!(
                        channel_id = message.channel.id,
                        message_id = message.id,
                        kind = %kind,
                        outcome = %outcome,
                        "Post relayed"
                    );
                }
            }
            Err(e) => {
                self.stats.record_suppressed();
                error!(
                    channel_id = message.channel.id,
                    message_id = message.id,
                    kind = %kind,
                    error = %e,
                    "Post not relayed"
                );
            }
        }
    }
}
