//! Conversion of Telegram updates into router messages.

use teloxide::types::{Message, Update, UpdateKind};

use crate::core::message::{IncomingMessage, Media, MediaKind, MessageContent, Sender};

/// Parse a raw webhook body. Returns `None` for payloads that are not a
/// new message the router understands.
///
/// Parses straight from bytes: teloxide's `Update` does not survive a
/// detour through `serde_json::Value` and comes out as `UpdateKind::Error`.
pub fn parse_update(body: &[u8]) -> Option<IncomingMessage> {
    let update: Update = match serde_json::from_slice(body) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Ignoring unparseable update: {}", e);
            return None;
        }
    };

    match update.kind {
        UpdateKind::Message(msg) => incoming_from_message(&msg),
        _ => {
            tracing::debug!("Ignoring non-message update");
            None
        }
    }
}

/// Extract sender, content and reply context from a Telegram message.
pub fn incoming_from_message(msg: &Message) -> Option<IncomingMessage> {
    let user = msg.from.as_ref()?;
    let sender = Sender {
        id: user.id.0.to_string(),
        first_name: Some(user.first_name.clone()).filter(|n| !n.is_empty()),
        username: user.username.clone(),
    };

    let Some(content) = content_of(msg) else {
        tracing::debug!("Ignoring unsupported message from {}", sender.id);
        return None;
    };

    let reply_to_text = msg.reply_to_message().map(|replied| {
        replied
            .text()
            .or_else(|| replied.caption())
            .unwrap_or_default()
            .to_string()
    });

    Some(IncomingMessage {
        chat_id: msg.chat.id.0.to_string(),
        sender,
        content,
        reply_to_text,
    })
}

fn content_of(msg: &Message) -> Option<MessageContent> {
    if let Some(text) = msg.text() {
        return Some(MessageContent::Text(text.to_string()));
    }

    let caption = msg.caption().map(str::to_string);
    let media = if let Some(photos) = msg.photo() {
        // Sizes are ordered smallest first.
        let largest = photos.last()?;
        Media::new(MediaKind::Photo, largest.file.id.to_string())
    } else if let Some(video) = msg.video() {
        Media::new(MediaKind::Video, video.file.id.to_string())
    } else if let Some(doc) = msg.document() {
        Media::new(MediaKind::Document, doc.file.id.to_string())
    } else if let Some(audio) = msg.audio() {
        Media::new(MediaKind::Audio, audio.file.id.to_string())
    } else if let Some(voice) = msg.voice() {
        Media::new(MediaKind::Voice, voice.file.id.to_string())
    } else if let Some(sticker) = msg.sticker() {
        Media::new(MediaKind::Sticker, sticker.file.id.to_string())
    } else {
        return None;
    };

    Some(MessageContent::Media(media.with_caption(caption)))
}
