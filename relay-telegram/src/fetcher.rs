//! Downloads inbound media through the Bot API file endpoint.

use async_trait::async_trait;
use relay_core::{Attachment, MediaError, MediaFetcher};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::debug;

/// Bot API refuses `getFile` downloads above 20 MB.
pub const MAX_DOWNLOAD_BYTES: u64 = 20 * 1024 * 1024;

pub struct TelegramMediaFetcher {
    bot: teloxide::Bot,
}

impl TelegramMediaFetcher {
    /// `bot` must be the identity that received the post; file ids are scoped to it.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaFetcher for TelegramMediaFetcher {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, MediaError> {
        let download_error = |reason: String| MediaError::Download {
            file_id: attachment.file_id.clone(),
            reason,
        };

        if let Some(size) = attachment.size.filter(|s| *s > MAX_DOWNLOAD_BYTES) {
            return Err(download_error(format!(
                "file is {} bytes, above the {} byte download limit",
                size, MAX_DOWNLOAD_BYTES
            )));
        }

        let file = self
            .bot
            .get_file(FileId(attachment.file_id.clone()))
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let mut buffer = Vec::new();
        self.bot
            .download_file(&file.path, &mut buffer)
            .await
            .map_err(|e| download_error(e.to_string()))?;

        debug!(
            file_id = %attachment.file_id,
            bytes = buffer.len(),
            "Media downloaded"
        );
        Ok(buffer)
    }
}
