//! Per-message dispatch: commands, admin replies, AI, forwarding.

use std::sync::Arc;

use chrono::Utc;

use crate::access::AccessControl;
use crate::error::Result;
use crate::store::{StateStore, UserRecord};
use crate::telegram::Messenger;

use super::commands::Command;
use super::forward::{self, extract_target_user};
use super::message::{IncomingMessage, MessageContent, Sender};
use super::responder::AiResponder;

pub const FORWARDED_ACK: &str = "Your message has been forwarded to our team.";
pub const UNKNOWN_TARGET_REPLY: &str =
    "Cannot determine the target user. Please reply to a forwarded user message.";

/// The relay: routes every inbound message to admins, the AI responder or
/// back to a user.
pub struct Relay {
    pub(super) store: Arc<StateStore>,
    pub(super) access: AccessControl,
    pub(super) messenger: Arc<dyn Messenger>,
    pub(super) responder: AiResponder,
}

impl Relay {
    pub fn new(
        store: Arc<StateStore>,
        access: AccessControl,
        messenger: Arc<dyn Messenger>,
        responder: AiResponder,
    ) -> Self {
        Self {
            store,
            access,
            messenger,
            responder,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn responder(&self) -> &AiResponder {
        &self.responder
    }

    /// Handle one inbound message. Errors are replies that could not be
    /// delivered to the sender; everything else is handled here.
    pub async fn handle(&self, msg: &IncomingMessage) -> Result<()> {
        if let Some(command) = msg.text().and_then(Command::parse) {
            tracing::debug!("Command {:?} from {}", command, msg.sender.id);
            return self.handle_command(command, msg).await;
        }

        let admins = self.store.load_admins();
        if self.access.is_admin(&admins, &msg.sender.id) {
            if msg.is_reply() {
                return self.route_admin_reply(msg).await;
            }
            tracing::debug!("Ignoring non-reply message from admin {}", msg.sender.id);
            return Ok(());
        }

        self.register(&msg.sender);
        let ai_enabled = self.store.ai_enabled_for(&msg.sender.id);

        match &msg.content {
            MessageContent::Text(text) => {
                forward::forward_text(self.messenger.as_ref(), &admins, &msg.sender, text).await;
                if ai_enabled {
                    let prompt = self.store.load_ai_settings().character_prompt;
                    self.responder
                        .respond(
                            self.messenger.as_ref(),
                            &msg.chat_id,
                            &msg.sender.id,
                            text,
                            &prompt,
                        )
                        .await
                } else {
                    self.reply(msg, FORWARDED_ACK).await
                }
            }
            MessageContent::Media(media) => {
                forward::forward_media(self.messenger.as_ref(), &admins, &msg.sender, media).await;
                // With AI on there is no media path; the forward is the handling.
                if ai_enabled {
                    Ok(())
                } else {
                    self.reply(msg, FORWARDED_ACK).await
                }
            }
        }
    }

    /// Deliver an admin's reply to the user named in the replied-to footer.
    async fn route_admin_reply(&self, msg: &IncomingMessage) -> Result<()> {
        let Some(target) = msg.reply_to_text.as_deref().and_then(extract_target_user) else {
            return self.reply(msg, UNKNOWN_TARGET_REPLY).await;
        };

        match &msg.content {
            MessageContent::Text(text) => match self.messenger.send_text(&target, text).await {
                Ok(()) => {
                    tracing::info!("Admin {} replied to user {}", msg.sender.id, target);
                    self.reply(msg, "Message sent to user.").await
                }
                Err(e) => {
                    tracing::warn!("Reply to user {} failed: {}", target, e);
                    self.reply(msg, &format!("Failed to send message: {}", e)).await
                }
            },
            MessageContent::Media(media) => {
                match self
                    .messenger
                    .send_media(&target, media, media.caption.as_deref())
                    .await
                {
                    Ok(()) => {
                        tracing::info!("Admin {} sent {} to user {}", msg.sender.id, media.kind, target);
                        self.reply(msg, "Media sent to user.").await
                    }
                    Err(e) => {
                        tracing::warn!("Media to user {} failed: {}", target, e);
                        self.reply(msg, &format!("Failed to send media: {}", e)).await
                    }
                }
            }
        }
    }

    /// Record a regular sender the first time they are seen.
    pub(super) fn register(&self, sender: &Sender) {
        let record = UserRecord {
            id: sender.id.clone(),
            username: sender.username.clone(),
            first_name: sender.first_name.clone(),
            joined: Utc::now(),
            ai_enabled: None,
        };
        if let Err(e) = self.store.register_user(record) {
            tracing::warn!("Failed to register user {}: {}", sender.id, e);
        }
    }

    pub(super) async fn reply(&self, msg: &IncomingMessage, text: &str) -> Result<()> {
        self.messenger.send_text(&msg.chat_id, text).await
    }
}
