//! Telegram bot integration.

pub mod client;
pub mod messenger;
pub mod update;

pub use client::{register_commands, register_webhook};
pub use messenger::{Messenger, TelegramMessenger};
pub use update::parse_update;
