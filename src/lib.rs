//! relaybot library root.

pub mod access;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod providers;
pub mod store;
pub mod telegram;
pub mod web;

pub use access::AccessControl;
pub use cli::Commands;
pub use config::Settings;
pub use core::{AiResponder, IncomingMessage, Relay};
pub use error::{Error, Result};
pub use providers::CompletionProvider;
pub use store::StateStore;
pub use telegram::Messenger;
