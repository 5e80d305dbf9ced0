//! Completion provider trait for relaybot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The service answered but carried no usable candidate text.
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Author of a conversation turn.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of a conversation transcript.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Generative completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name.
    fn name(&self) -> &str;

    /// Complete a conversation. `system_prompt` leads the request as a
    /// system instruction and `history` ends with the newest user turn.
    async fn complete(&self, system_prompt: &str, history: &[Turn]) -> Result<String>;
}
