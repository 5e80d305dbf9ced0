//! Inbound message model.

use std::fmt;

/// Kind of a non-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    Sticker,
}

impl MediaKind {
    /// Label used in forwarded captions.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Photo => "Photo",
            MediaKind::Video => "Video",
            MediaKind::Document => "Document",
            MediaKind::Audio => "Audio",
            MediaKind::Voice => "Voice message",
            MediaKind::Sticker => "Sticker",
        }
    }

    pub fn supports_caption(&self) -> bool {
        !matches!(self, MediaKind::Sticker)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A media attachment referenced by its platform file id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub kind: MediaKind,
    pub file_id: String,
    pub caption: Option<String>,
}

impl Media {
    pub fn new(kind: MediaKind, file_id: impl Into<String>) -> Self {
        Self {
            kind,
            file_id: file_id.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Media(Media),
}

/// Who sent a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

impl Sender {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            username: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or("Unknown")
    }

    pub fn handle(&self) -> &str {
        self.username.as_deref().unwrap_or("no_username")
    }
}

/// A message the router can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat to answer in.
    pub chat_id: String,
    pub sender: Sender,
    pub content: MessageContent,
    /// Text (or caption) of the message this one replies to. `Some("")`
    /// marks a reply to a message without any text.
    pub reply_to_text: Option<String>,
}

impl IncomingMessage {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(t) => Some(t.as_str()),
            MessageContent::Media(_) => None,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_text.is_some()
    }
}
