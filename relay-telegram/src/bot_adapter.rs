//! Wraps teloxide::Bot and implements [`relay_core::Destination`] for the destination channel.

use async_trait::async_trait;
use relay_core::{DeliveryError, Destination, MediaPayload};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, ParseMode, Recipient};
use teloxide::RequestError;

/// Sends relayed posts to one destination chat with HTML parse mode.
pub struct TelegramDestination {
    bot: teloxide::Bot,
    chat: Recipient,
}

impl TelegramDestination {
    pub fn new(bot: teloxide::Bot, chat: Recipient) -> Self {
        Self { bot, chat }
    }
}

/// Reference payloads reuse the file id; buffers are uploaded from memory.
pub fn input_file(media: MediaPayload) -> InputFile {
    match media {
        MediaPayload::Reference(file_id) => InputFile::file_id(FileId(file_id)),
        MediaPayload::Buffer(buffer) => {
            let (bytes, file_name) = buffer.into_parts();
            InputFile::memory(bytes).file_name(file_name)
        }
    }
}

pub fn map_request_error(e: RequestError) -> DeliveryError {
    match e {
        RequestError::Api(api) => DeliveryError::Rejected(api.to_string()),
        RequestError::Network(net) => DeliveryError::Network(net.to_string()),
        other => DeliveryError::Other(other.to_string()),
    }
}

#[async_trait]
impl Destination for TelegramDestination {
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat.clone(), text.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_photo(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_photo(self.chat.clone(), input_file(media))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_video(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_video(self.chat.clone(), input_file(media))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_document(
        &self,
        media: MediaPayload,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_document(self.chat.clone(), input_file(media))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_audio(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_audio(self.chat.clone(), input_file(media))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_voice(&self, media: MediaPayload, caption: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_voice(self.chat.clone(), input_file(media))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_sticker(&self, media: MediaPayload) -> Result<(), DeliveryError> {
        self.bot
            .send_sticker(self.chat.clone(), input_file(media))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_animation(
        &self,
        media: MediaPayload,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_animation(self.chat.clone(), input_file(media))
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }
}
