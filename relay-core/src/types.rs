//! Core types: channel identity, inbound message, content kinds, resolved content and delivery outcome.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Origin channel identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: i64,
    /// Public handle without the leading `@`.
    pub username: Option<String>,
    pub title: Option<String>,
}

impl ChannelInfo {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            title: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Kind of content carried by a message. Exactly one per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    Sticker,
    Animation,
    Text,
    None,
}

impl ContentKind {
    /// Media kinds in resolution order; first match wins.
    pub const MEDIA_PRIORITY: [ContentKind; 7] = [
        ContentKind::Photo,
        ContentKind::Video,
        ContentKind::Document,
        ContentKind::Audio,
        ContentKind::Voice,
        ContentKind::Sticker,
        ContentKind::Animation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Photo => "photo",
            ContentKind::Video => "video",
            ContentKind::Document => "document",
            ContentKind::Audio => "audio",
            ContentKind::Voice => "voice",
            ContentKind::Sticker => "sticker",
            ContentKind::Animation => "animation",
            ContentKind::Text => "text",
            ContentKind::None => "none",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media attachment of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: ContentKind,
    /// Transport file id, valid for the bot that received the message.
    pub file_id: String,
    pub file_name: Option<String>,
    pub size: Option<u64>,
}

impl Attachment {
    pub fn new(kind: ContentKind, file_id: impl Into<String>) -> Self {
        Self {
            kind,
            file_id: file_id.into(),
            file_name: None,
            size: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// A new post observed in a monitored channel. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub channel: ChannelInfo,
    pub id: i32,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub attachments: Vec<Attachment>,
    /// Description of media the relay cannot express (e.g. "location", "poll").
    pub unsupported_media: Option<String>,
    pub date: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(channel: ChannelInfo, id: i32) -> Self {
        Self {
            channel,
            id,
            text: None,
            caption: None,
            attachments: Vec::new(),
            unsupported_media: None,
            date: Utc::now(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_unsupported_media(mut self, description: impl Into<String>) -> Self {
        self.unsupported_media = Some(description.into());
        self
    }

    /// Text used for classification and captions: text body, else caption. Blank strings count as absent.
    pub fn body(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.caption.as_deref().filter(|c| !c.trim().is_empty()))
    }

    /// Explicit caption first, then the text body.
    pub fn caption_source(&self) -> Option<&str> {
        self.caption
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.text.as_deref().filter(|t| !t.trim().is_empty()))
    }
}

/// Downloaded media bytes, owned by the send call that consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBuffer {
    bytes: Vec<u8>,
    file_name: String,
}

impl MediaBuffer {
    /// Wraps downloaded bytes. A zero-byte download is [`MediaError::Empty`].
    pub fn new(
        file_id: &str,
        bytes: Vec<u8>,
        file_name: impl Into<String>,
    ) -> Result<Self, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty {
                file_id: file_id.to_string(),
            });
        }
        Ok(Self {
            bytes,
            file_name: file_name.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.bytes, self.file_name)
    }
}

/// How media is handed to the destination: by transport reference or as re-uploaded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPayload {
    Reference(String),
    Buffer(MediaBuffer),
}

/// Resolved content, one variant per deliverable kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Photo(MediaPayload),
    Video(MediaPayload),
    Document(MediaPayload),
    Audio(MediaPayload),
    Voice(MediaPayload),
    Sticker(MediaPayload),
    Animation(MediaPayload),
    Text,
    None,
    Unsupported(String),
}

impl Content {
    pub fn from_payload(kind: ContentKind, payload: MediaPayload) -> Self {
        match kind {
            ContentKind::Photo => Content::Photo(payload),
            ContentKind::Video => Content::Video(payload),
            ContentKind::Document => Content::Document(payload),
            ContentKind::Audio => Content::Audio(payload),
            ContentKind::Voice => Content::Voice(payload),
            ContentKind::Sticker => Content::Sticker(payload),
            ContentKind::Animation => Content::Animation(payload),
            ContentKind::Text => Content::Text,
            ContentKind::None => Content::None,
        }
    }

    /// Kind of this content. Unsupported media reports as `None`.
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Photo(_) => ContentKind::Photo,
            Content::Video(_) => ContentKind::Video,
            Content::Document(_) => ContentKind::Document,
            Content::Audio(_) => ContentKind::Audio,
            Content::Voice(_) => ContentKind::Voice,
            Content::Sticker(_) => ContentKind::Sticker,
            Content::Animation(_) => ContentKind::Animation,
            Content::Text => ContentKind::Text,
            Content::None | Content::Unsupported(_) => ContentKind::None,
        }
    }
}

/// Successful result of a relay attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    NotRelevant,
    Delivered,
    FallbackText,
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::NotRelevant => "not_relevant",
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::FallbackText => "fallback_text",
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured channel: numeric chat id or public handle (stored without `@`).
///
/// Deserializes from a JSON number or string. Numeric strings become ids; `@name`, `name` and
/// `https://t.me/name` become handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawChannelRef")]
pub enum ChannelRef {
    Id(i64),
    Username(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChannelRef {
    Number(i64),
    Text(String),
}

impl From<RawChannelRef> for ChannelRef {
    fn from(raw: RawChannelRef) -> Self {
        match raw {
            RawChannelRef::Number(id) => ChannelRef::Id(id),
            RawChannelRef::Text(s) => ChannelRef::parse(&s),
        }
    }
}

impl ChannelRef {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return ChannelRef::Id(id);
        }
        let handle = trimmed
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("t.me/")
            .trim_start_matches('@')
            .trim_end_matches('/');
        ChannelRef::Username(handle.to_string())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ChannelRef::Username(name) if name.is_empty())
    }
}

impl FromStr for ChannelRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ChannelRef::parse(s))
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "{}", id),
            ChannelRef::Username(name) => write!(f, "@{}", name),
        }
    }
}

/// Media payload strategy. `Auto` references file ids when ingest and posting identities match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaMode {
    #[default]
    Auto,
    Reference,
    Reupload,
}

impl MediaMode {
    /// Whether media must be downloaded and re-uploaded.
    pub fn reupload(&self, same_identity: bool) -> bool {
        match self {
            MediaMode::Auto => !same_identity,
            MediaMode::Reference => false,
            MediaMode::Reupload => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ref_from_number_and_strings() {
        let refs: Vec<ChannelRef> =
            serde_json::from_str(r#"[-1001234567890, "@rustlang", "https://t.me/tokio", "-100500", "plain"]"#)
                .unwrap();
        assert_eq!(
            refs,
            vec![
                ChannelRef::Id(-1001234567890),
                ChannelRef::Username("rustlang".to_string()),
                ChannelRef::Username("tokio".to_string()),
                ChannelRef::Id(-100500),
                ChannelRef::Username("plain".to_string()),
            ]
        );
    }

    #[test]
    fn test_channel_ref_display() {
        assert_eq!(ChannelRef::Id(-100).to_string(), "-100");
        assert_eq!(ChannelRef::parse("@news").to_string(), "@news");
        assert!(ChannelRef::parse("@").is_blank());
    }

    #[test]
    fn test_body_prefers_text_then_caption() {
        let msg = InboundMessage::new(ChannelInfo::new(-1001), 1)
            .with_text("  ")
            .with_caption("caption");
        assert_eq!(msg.body(), Some("caption"));

        let msg = InboundMessage::new(ChannelInfo::new(-1001), 2)
            .with_text("text")
            .with_caption("caption");
        assert_eq!(msg.body(), Some("text"));
        assert_eq!(msg.caption_source(), Some("caption"));

        let msg = InboundMessage::new(ChannelInfo::new(-1001), 3);
        assert_eq!(msg.body(), None);
    }

    #[test]
    fn test_media_buffer_rejects_empty() {
        let err = MediaBuffer::new("f1", Vec::new(), "a.bin").unwrap_err();
        assert_eq!(err, MediaError::Empty { file_id: "f1".to_string() });

        let buf = MediaBuffer::new("f1", vec![1, 2, 3], "a.bin").unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.into_parts(), (vec![1, 2, 3], "a.bin".to_string()));
    }

    #[test]
    fn test_media_mode_reupload_decision() {
        assert!(!MediaMode::Auto.reupload(true));
        assert!(MediaMode::Auto.reupload(false));
        assert!(!MediaMode::Reference.reupload(false));
        assert!(MediaMode::Reupload.reupload(true));
    }

    #[test]
    fn test_content_kind_of_unsupported_is_none() {
        assert_eq!(Content::Unsupported("poll".into()).kind(), ContentKind::None);
        assert_eq!(
            Content::from_payload(ContentKind::Voice, MediaPayload::Reference("v".into())).kind(),
            ContentKind::Voice
        );
    }
}
