//! Outbound Telegram calls.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile};

use crate::core::message::{Media, MediaKind};
use crate::error::{Error, Result};

/// Send-side of the chat platform. Chat ids are the decimal strings used
/// throughout the state documents.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<()>;

    /// Send a media item by file id. `caption` is ignored for stickers.
    async fn send_media(&self, chat_id: &str, media: &Media, caption: Option<&str>) -> Result<()>;

    async fn send_typing(&self, chat_id: &str) -> Result<()>;
}

pub fn parse_chat_id(chat_id: &str) -> Result<ChatId> {
    chat_id
        .trim()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| Error::InvalidChatId(chat_id.to_string()))
}

/// teloxide-backed messenger.
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<()> {
        self.bot.send_message(parse_chat_id(chat_id)?, text).await?;
        Ok(())
    }

    async fn send_media(&self, chat_id: &str, media: &Media, caption: Option<&str>) -> Result<()> {
        let chat_id = parse_chat_id(chat_id)?;
        let file = InputFile::file_id(media.file_id.clone());
        let caption = caption.map(str::to_string);

        match media.kind {
            MediaKind::Photo => {
                let mut req = self.bot.send_photo(chat_id, file);
                if let Some(c) = caption {
                    req = req.caption(c);
                }
                req.await?;
            }
            MediaKind::Video => {
                let mut req = self.bot.send_video(chat_id, file);
                if let Some(c) = caption {
                    req = req.caption(c);
                }
                req.await?;
            }
            MediaKind::Document => {
                let mut req = self.bot.send_document(chat_id, file);
                if let Some(c) = caption {
                    req = req.caption(c);
                }
                req.await?;
            }
            MediaKind::Audio => {
                let mut req = self.bot.send_audio(chat_id, file);
                if let Some(c) = caption {
                    req = req.caption(c);
                }
                req.await?;
            }
            MediaKind::Voice => {
                let mut req = self.bot.send_voice(chat_id, file);
                if let Some(c) = caption {
                    req = req.caption(c);
                }
                req.await?;
            }
            MediaKind::Sticker => {
                self.bot.send_sticker(chat_id, file).await?;
            }
        }
        Ok(())
    }

    async fn send_typing(&self, chat_id: &str) -> Result<()> {
        self.bot
            .send_chat_action(parse_chat_id(chat_id)?, ChatAction::Typing)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_id() {
        assert_eq!(parse_chat_id("42").unwrap(), ChatId(42));
        assert_eq!(parse_chat_id("-100123").unwrap(), ChatId(-100123));
        assert!(matches!(parse_chat_id("abc"), Err(Error::InvalidChatId(_))));
    }
}
