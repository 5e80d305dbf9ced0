//! AI auto-responder.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{CompletionProvider, ProviderError, Turn};
use crate::telegram::Messenger;

use super::conversation::ConversationStore;

/// Longest text Telegram accepts in one message.
pub const MESSAGE_CHUNK_LIMIT: usize = 4096;

pub const EMPTY_RESPONSE_REPLY: &str =
    "I'm having trouble processing your request right now. Please try again later.";
pub const ERROR_REPLY: &str =
    "Sorry, I encountered an error while generating a response. Please try again later.";

/// Split `text` into pieces of at most `limit` characters, in order.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Answers user text through a completion provider, keeping a bounded
/// transcript per user.
pub struct AiResponder {
    provider: Arc<dyn CompletionProvider>,
    conversations: ConversationStore,
}

impl AiResponder {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            conversations: ConversationStore::new(),
        }
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Generate and deliver a reply to `text`. A failed completion leaves the
    /// transcript untouched and sends an apology instead; it is not retried.
    pub async fn respond(
        &self,
        messenger: &dyn Messenger,
        chat_id: &str,
        user_id: &str,
        text: &str,
        character_prompt: &str,
    ) -> Result<()> {
        if let Err(e) = messenger.send_typing(chat_id).await {
            tracing::debug!("Typing action failed for {}: {}", chat_id, e);
        }

        let mut request = self.conversations.history(user_id).await;
        request.push(Turn::user(text));

        let reply = match self.provider.complete(character_prompt, &request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    "AI response via {} failed for user {}: {}",
                    self.provider.name(),
                    user_id,
                    e
                );
                let apology = match e {
                    ProviderError::EmptyResponse(_) => EMPTY_RESPONSE_REPLY,
                    _ => ERROR_REPLY,
                };
                messenger.send_text(chat_id, apology).await?;
                return Ok(());
            }
        };

        self.conversations.record_exchange(user_id, text, &reply).await;

        for chunk in split_message(&reply, MESSAGE_CHUNK_LIMIT) {
            messenger.send_text(chat_id, &chunk).await?;
        }
        Ok(())
    }
}
