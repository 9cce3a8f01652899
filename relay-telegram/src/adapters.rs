//! Adapters from Telegram (teloxide) types to relay_core types.

use std::fmt;

use relay_core::{Attachment, ChannelInfo, ContentKind, InboundMessage, ToInbound};
use teloxide::types::{Chat, FileMeta, MediaKind, Message, MessageKind};

/// Wraps a teloxide Chat for conversion to [`ChannelInfo`].
pub struct TelegramChatWrapper<'a>(pub &'a Chat);

impl<'a> TelegramChatWrapper<'a> {
    pub fn to_channel(&self) -> ChannelInfo {
        ChannelInfo {
            id: self.0.id.0,
            username: self.0.username().map(str::to_string),
            title: self.0.title().map(str::to_string),
        }
    }
}

/// Wraps a teloxide Message (channel post) for conversion to [`InboundMessage`].
pub struct TelegramMessageWrapper<'a>(pub &'a Message);

fn attachment(kind: ContentKind, file: &FileMeta, file_name: Option<&String>) -> Attachment {
    let mut attachment = Attachment::new(kind, file.id.0.clone()).with_size(u64::from(file.size));
    attachment.file_name = file_name.cloned();
    attachment
}

impl<'a> ToInbound for TelegramMessageWrapper<'a> {
    fn to_inbound(&self) -> InboundMessage {
        let msg = self.0;
        InboundMessage {
            channel: TelegramChatWrapper(&msg.chat).to_channel(),
            id: msg.id.0,
            text: msg.text().map(str::to_string),
            caption: msg.caption().map(str::to_string),
            attachments: self.attachments(),
            unsupported_media: self.unsupported_media(),
            date: msg.date,
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn attachments(&self) -> Vec<Attachment> {
        let msg = self.0;
        let mut out = Vec::new();
        // Sizes are ordered smallest first.
        if let Some(largest) = msg.photo().and_then(|sizes| sizes.last()) {
            out.push(attachment(ContentKind::Photo, &largest.file, None));
        }
        if let Some(video) = msg.video() {
            out.push(attachment(ContentKind::Video, &video.file, video.file_name.as_ref()));
        }
        if let Some(doc) = msg.document() {
            out.push(attachment(ContentKind::Document, &doc.file, doc.file_name.as_ref()));
        }
        if let Some(audio) = msg.audio() {
            out.push(attachment(ContentKind::Audio, &audio.file, audio.file_name.as_ref()));
        }
        if let Some(voice) = msg.voice() {
            out.push(attachment(ContentKind::Voice, &voice.file, None));
        }
        if let Some(sticker) = msg.sticker() {
            out.push(attachment(ContentKind::Sticker, &sticker.file, None));
        }
        if let Some(animation) = msg.animation() {
            out.push(attachment(
                ContentKind::Animation,
                &animation.file,
                animation.file_name.as_ref(),
            ));
        }
        out
    }

    /// Names media the relay cannot express (video notes, polls, stories, giveaways, ...).
    /// Every media kind without an attachment mapping is reported, so newer kinds take the
    /// fallback path instead of being dropped as empty posts.
    fn unsupported_media(&self) -> Option<String> {
        match &self.0.kind {
            MessageKind::Common(common) => match &common.media_kind {
                MediaKind::Text(_)
                | MediaKind::Photo(_)
                | MediaKind::Video(_)
                | MediaKind::Document(_)
                | MediaKind::Audio(_)
                | MediaKind::Voice(_)
                | MediaKind::Sticker(_)
                | MediaKind::Animation(_)
                | MediaKind::Migration(_) => None,
                other => Some(variant_name(other)),
            },
            MessageKind::Dice(_) => Some("dice".to_string()),
            other => {
                let name = variant_name(other);
                PAYLOAD_MESSAGE_KINDS.contains(&name.as_str()).then_some(name)
            }
        }
    }
}

/// Non-common message kinds that still carry a post payload. The rest are service messages.
const PAYLOAD_MESSAGE_KINDS: [&str; 3] = ["invoice", "giveaway", "giveaway_winners"];

/// Snake-case name of an enum variant, taken from its `Debug` output (`VideoNote(..)` → `video_note`).
fn variant_name<T: fmt::Debug>(value: &T) -> String {
    let debug = format!("{:?}", value);
    let variant = debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default();
    let mut name = String::with_capacity(variant.len() + 4);
    for (i, c) in variant.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                name.push('_');
            }
            name.extend(c.to_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}
