//! Content resolution: pick the content kind of a post and prepare its payload.

use std::sync::Arc;

use relay_core::{
    Attachment, Content, ContentKind, InboundMessage, MediaBuffer, MediaError, MediaFetcher,
    MediaPayload,
};
use tracing::{debug, info};

/// Highest-priority attachment of the message, if any.
pub fn select_attachment(message: &InboundMessage) -> Option<&Attachment> {
    ContentKind::MEDIA_PRIORITY
        .iter()
        .find_map(|kind| message.attachments.iter().find(|a| a.kind == *kind))
}

/// Kind a message would be relayed as, without touching the network.
pub fn content_kind(message: &InboundMessage) -> ContentKind {
    if let Some(attachment) = select_attachment(message) {
        return attachment.kind;
    }
    if message.text.as_deref().is_some_and(|t| !t.trim().is_empty()) {
        ContentKind::Text
    } else {
        ContentKind::None
    }
}

fn default_file_name(attachment: &Attachment) -> String {
    let ext = match attachment.kind {
        ContentKind::Photo => "jpg",
        ContentKind::Video | ContentKind::Animation => "mp4",
        ContentKind::Audio => "mp3",
        ContentKind::Voice => "ogg",
        ContentKind::Sticker => "webp",
        _ => "bin",
    };
    format!("{}.{}", attachment.kind, ext)
}

/// Resolves inbound posts into [`Content`]. Downloads media when re-upload is required.
pub struct ContentResolver {
    fetcher: Arc<dyn MediaFetcher>,
    reupload: bool,
}

impl ContentResolver {
    pub fn new(fetcher: Arc<dyn MediaFetcher>, reupload: bool) -> Self {
        Self { fetcher, reupload }
    }

    pub async fn resolve(&self, message: &InboundMessage) -> Result<Content, MediaError> {
        let Some(attachment) = select_attachment(message) else {
            if let Some(description) = &message.unsupported_media {
                return Ok(Content::Unsupported(description.clone()));
            }
            return Ok(match content_kind(message) {
                ContentKind::Text => Content::Text,
                _ => Content::None,
            });
        };

        if !self.reupload {
            debug!(kind = %attachment.kind, file_id = %attachment.file_id, "Relaying media by reference");
            return Ok(Content::from_payload(
                attachment.kind,
                MediaPayload::Reference(attachment.file_id.clone()),
            ));
        }

        let bytes = self.fetcher.fetch(attachment).await?;
        let file_name = attachment
            .file_name
            .clone()
            .unwrap_or_else(|| default_file_name(attachment));
        let buffer = MediaBuffer::new(&attachment.file_id, bytes, file_name)?;
        info!(
            kind = %attachment.kind,
            size = buffer.len(),
            "Media downloaded for re-upload"
        );
        Ok(Content::from_payload(attachment.kind, MediaPayload::Buffer(buffer)))
    }
}
