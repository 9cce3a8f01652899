//! Relay dispatcher: executes the delivery strategy for a content kind with a single text fallback tier.

use std::sync::Arc;

use relay_core::{Content, ContentKind, DeliveryOutcome, Destination, RelayError};
use tracing::{error, info, warn};

use crate::attribution::Attribution;
use crate::caption::CaptionFormatter;

pub struct RelayDispatcher {
    destination: Arc<dyn Destination>,
    formatter: CaptionFormatter,
}

impl RelayDispatcher {
    pub fn new(destination: Arc<dyn Destination>, formatter: CaptionFormatter) -> Self {
        Self {
            destination,
            formatter,
        }
    }

    /// Relays one post.
    ///
    /// `relevant == false` returns [`DeliveryOutcome::NotRelevant`] without any outbound call.
    /// Media failures degrade to a text-only post; if that is impossible or fails too the post
    /// is [`RelayError::Suppressed`].
    pub async fn relay(
        &self,
        content: Content,
        body: Option<&str>,
        attribution: &Attribution,
        relevant: bool,
    ) -> Result<DeliveryOutcome, RelayError> {
        if !relevant {
            return Ok(DeliveryOutcome::NotRelevant);
        }

        let kind = content.kind();
        let caption = || self.formatter.caption(kind, body, attribution);
        let sent = match content {
            Content::Text | Content::None => return self.send_text_post(kind, body, attribution).await,
            Content::Unsupported(description) => {
                warn!(media = %description, "Unsupported media kind, relaying text only");
                return self
                    .degrade(kind, format!("unsupported media: {}", description), body, attribution)
                    .await;
            }
            Content::Photo(media) => self.destination.send_photo(media, &caption()).await,
            Content::Video(media) => self.destination.send_video(media, &caption()).await,
            Content::Document(media) => self.destination.send_document(media, &caption()).await,
            Content::Audio(media) => self.destination.send_audio(media, &caption()).await,
            Content::Voice(media) => self.destination.send_voice(media, &caption()).await,
            // Stickers cannot carry a caption.
            Content::Sticker(media) => self.destination.send_sticker(media).await,
            Content::Animation(media) => self.destination.send_animation(media, &caption()).await,
        };

        match sent {
            Ok(()) => Ok(DeliveryOutcome::Delivered),
            Err(e) => {
                warn!(kind = %kind, error = %e, "Media delivery failed, falling back to text");
                self.degrade(kind, e.to_string(), body, attribution).await
            }
        }
    }

    async fn send_text_post(
        &self,
        kind: ContentKind,
        body: Option<&str>,
        attribution: &Attribution,
    ) -> Result<DeliveryOutcome, RelayError> {
        let Some(text) = self.formatter.text_post(body, attribution) else {
            return Err(RelayError::Suppressed {
                kind,
                cause: "post has no text or media to relay".to_string(),
            });
        };
        match self.destination.send_text(&text).await {
            Ok(()) => Ok(DeliveryOutcome::Delivered),
            Err(e) => Err(RelayError::Suppressed {
                kind,
                cause: e.to_string(),
            }),
        }
    }

    /// Fallback tier: text-only post with the attachment-lost marker.
    pub async fn degrade(
        &self,
        kind: ContentKind,
        cause: String,
        body: Option<&str>,
        attribution: &Attribution,
    ) -> Result<DeliveryOutcome, RelayError> {
        let Some(text) = self.formatter.fallback(body, attribution) else {
            error!(kind = %kind, cause = %cause, "No text to fall back to, post suppressed");
            return Err(RelayError::Suppressed {
                kind,
                cause: format!("{}; no text to fall back to", cause),
            });
        };
        match self.destination.send_text(&text).await {
            Ok(()) => {
                info!(kind = %kind, "Relayed as text fallback");
                Ok(DeliveryOutcome::FallbackText)
            }
            Err(e) => {
                error!(kind = %kind, cause = %cause, error = %e, "Fallback delivery failed, post suppressed");
                Err(RelayError::Suppressed {
                    kind,
                    cause: format!("{}; fallback failed: {}", cause, e),
                })
            }
        }
    }
}
