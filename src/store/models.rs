//! Persisted state records: admin list, user records, AI settings.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prompt used until an admin sets a character with `/setcharacter`.
pub const DEFAULT_CHARACTER_PROMPT: &str = "You are InstantTalkBot, a friendly and helpful AI assistant for Telegram. You have a vibrant personality and love to chat with users. You provide helpful and thoughtful responses while maintaining a positive and engaging tone. Your goal is to create meaningful conversations and provide valuable feedback to users. Be concise but informative, and always try to add a touch of personality to your responses.";

/// Ordered admin ids. The first entry is the primary admin unless an
/// owner id is configured.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct AdminSet(Vec<String>);

/// Why an admin-set mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminChangeError {
    AlreadyAdmin,
    LastAdmin,
    PrimaryAdmin,
    NotFound,
}

impl fmt::Display for AdminChangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AdminChangeError::AlreadyAdmin => "This user is already an admin.",
            AdminChangeError::LastAdmin => "Cannot remove the last admin.",
            AdminChangeError::PrimaryAdmin => "Cannot remove the primary admin (bot owner).",
            AdminChangeError::NotFound => "Admin not found.",
        };
        f.write_str(msg)
    }
}

impl AdminSet {
    pub fn new(ids: Vec<String>) -> Self {
        Self(ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|a| a == id)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a new admin.
    pub fn add(&mut self, id: &str) -> Result<(), AdminChangeError> {
        if self.contains(id) {
            return Err(AdminChangeError::AlreadyAdmin);
        }
        self.0.push(id.to_string());
        Ok(())
    }

    /// Remove an admin, refusing anything that would leave the set empty or
    /// without its primary.
    pub fn remove(&mut self, id: &str, primary: Option<&str>) -> Result<(), AdminChangeError> {
        if self.0.len() == 1 && self.contains(id) {
            return Err(AdminChangeError::LastAdmin);
        }
        if primary == Some(id) {
            return Err(AdminChangeError::PrimaryAdmin);
        }
        let before = self.0.len();
        self.0.retain(|a| a != id);
        if self.0.len() == before {
            return Err(AdminChangeError::NotFound);
        }
        Ok(())
    }
}

/// A regular user known to the bot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub joined: DateTime<Utc>,
    /// Explicit per-user override of the global AI flag.
    #[serde(rename = "aiEnabled", default, skip_serializing_if = "Option::is_none")]
    pub ai_enabled: Option<bool>,
}

impl UserRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            username: None,
            first_name: None,
            joined: Utc::now(),
            ai_enabled: None,
        }
    }
}

/// Users keyed by id.
pub type UserMap = HashMap<String, UserRecord>;

/// Global AI configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AiSettings {
    pub enabled: bool,
    #[serde(rename = "characterPrompt")]
    pub character_prompt: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            character_prompt: DEFAULT_CHARACTER_PROMPT.to_string(),
        }
    }
}

impl AiSettings {
    /// Resolve the AI flag for a user: explicit override first, global
    /// default otherwise.
    pub fn effective_for(&self, user: Option<&UserRecord>) -> bool {
        user.and_then(|u| u.ai_enabled).unwrap_or(self.enabled)
    }
}
