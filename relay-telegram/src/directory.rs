//! Resolves configured channel references with `getChat` and checks the bot administers them.

use async_trait::async_trait;
use relay_core::{ChannelDirectory, ChannelInfo, ChannelRef, ValidationError};
use teloxide::prelude::*;
use teloxide::types::Recipient;
use teloxide::{ApiError, RequestError};

pub struct TelegramDirectory {
    bot: teloxide::Bot,
}

impl TelegramDirectory {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Bot API delivers `channel_post` updates only for channels the bot administers.
    async fn ensure_admin(&self, channel: &ChannelRef, chat_id: ChatId) -> Result<(), ValidationError> {
        let unreachable = |e: RequestError| ValidationError::Unreachable {
            channel: channel.to_string(),
            reason: e.to_string(),
        };
        let me = self.bot.get_me().await.map_err(unreachable)?;
        let member = self
            .bot
            .get_chat_member(chat_id, me.id)
            .await
            .map_err(unreachable)?;
        if member.kind.is_privileged() {
            Ok(())
        } else {
            Err(ValidationError::NotAdmin {
                channel: channel.to_string(),
            })
        }
    }
}

pub fn recipient(channel: &ChannelRef) -> Recipient {
    match channel {
        ChannelRef::Id(id) => Recipient::Id(ChatId(*id)),
        ChannelRef::Username(name) => Recipient::ChannelUsername(format!("@{}", name)),
    }
}

#[async_trait]
impl ChannelDirectory for TelegramDirectory {
    async fn resolve(&self, channel: &ChannelRef) -> Result<ChannelInfo, ValidationError> {
        if channel.is_blank() {
            return Err(ValidationError::NotFound {
                channel: channel.to_string(),
                reason: "empty channel handle".to_string(),
            });
        }

        match self.bot.get_chat(recipient(channel)).await {
            Ok(chat) => {
                self.ensure_admin(channel, chat.id).await?;
                let mut info = ChannelInfo::new(chat.id.0);
                if let ChannelRef::Username(name) = channel {
                    info = info.with_username(name.clone());
                }
                Ok(info)
            }
            Err(RequestError::Api(ApiError::ChatNotFound)) => Err(ValidationError::NotFound {
                channel: channel.to_string(),
                reason: ApiError::ChatNotFound.to_string(),
            }),
            Err(e) => Err(ValidationError::Unreachable {
                channel: channel.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
