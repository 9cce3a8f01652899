//! Transport seams between the relay pipeline and the messaging platform.
//!
//! [`Destination`] sends to the destination channel, [`MediaFetcher`] downloads inbound media,
//! [`ChannelDirectory`] resolves configured channels, [`ToInbound`] converts transport updates.
//! relay-telegram implements all of them via teloxide.

use async_trait::async_trait;

use crate::error::{DeliveryError, MediaError, ValidationError};
use crate::types::{Attachment, ChannelInfo, ChannelRef, InboundMessage, MediaPayload};

/// Outbound calls against the single destination channel. Captions and text are HTML.
#[async_trait]
pub trait Destination: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError>;
    async fn send_photo(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError>;
    async fn send_video(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError>;
    async fn send_document(&self, media: MediaPayload, caption: &str)
        -> Result<(), DeliveryError>;
    async fn send_audio(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError>;
    async fn send_voice(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError>;
    /// Stickers carry no caption.
    async fn send_sticker(&self, media: MediaPayload) -> Result<(), DeliveryError>;
    async fn send_animation(
        &self,
        media: MediaPayload,
        caption: &str,
    ) -> Result<(), DeliveryError>;
}

/// Downloads the bytes of an inbound attachment for re-upload.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, MediaError>;
}

/// Resolves a configured channel reference to its identity.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    async fn resolve(&self, channel: &ChannelRef) -> Result<ChannelInfo, ValidationError>;
}

/// Converts a transport-specific update to an [`InboundMessage`].
pub trait ToInbound: Send + Sync {
    fn to_inbound(&self) -> InboundMessage;
}
