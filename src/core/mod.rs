//! Core routing: commands, admin replies, forwarding and AI answers.

pub mod commands;
pub mod conversation;
pub mod forward;
pub mod message;
pub mod responder;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use conversation::ConversationStore;
pub use message::{IncomingMessage, Media, MediaKind, MessageContent, Sender};
pub use responder::AiResponder;
pub use router::Relay;
