//! Configuration for relaybot.
//!
//! Every setting is a command-line flag with an environment fallback, so a
//! hosted deployment can be driven entirely by `PORT`, `BOT_TOKEN`,
//! `WEBHOOK_URL`, `ADMIN_ID` and `GEMINI_API_KEY`.

use std::path::PathBuf;

use clap::Args;

use crate::error::{Error, Result};
use crate::providers::gemini::DEFAULT_MODEL;

/// Admin id written to a fresh admin list when no owner is configured.
pub const PLACEHOLDER_ADMIN_ID: &str = "123456789";

/// Runtime settings.
#[derive(Args, Clone, Debug)]
pub struct Settings {
    /// Port for the webhook server
    #[arg(long, env = "PORT", default_value_t = 3000, global = true)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    pub host: String,

    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true, global = true)]
    pub bot_token: Option<String>,

    /// Externally reachable base URL used to register the webhook
    #[arg(long, env = "WEBHOOK_URL", global = true)]
    pub webhook_url: Option<String>,

    /// Telegram id of the bot owner (primary admin)
    #[arg(long, env = "ADMIN_ID", global = true)]
    pub admin_id: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub gemini_model: String,

    /// Override for the Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", global = true)]
    pub gemini_base_url: Option<String>,

    /// Directory holding admins.json, users.json and ai_settings.json
    #[arg(long, env = "DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,
}

impl Settings {
    /// Bot token, required for anything that talks to Telegram.
    pub fn require_token(&self) -> Result<&str> {
        self.bot_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Config("BOT_TOKEN is not set".to_string()))
    }

    /// Id seeded into a fresh admin list.
    pub fn seed_admin_id(&self) -> &str {
        match self.admin_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.trim(),
            _ => PLACEHOLDER_ADMIN_ID,
        }
    }

    /// Full webhook URL, `<WEBHOOK_URL>/webhook/<BOT_TOKEN>`, if configured.
    pub fn webhook_endpoint(&self) -> Result<Option<String>> {
        let Some(base) = self.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        let token = self.require_token()?;
        Ok(Some(format!("{}/webhook/{}", base.trim_end_matches('/'), token)))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["relaybot"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).settings
    }

    #[test]
    fn test_webhook_endpoint() {
        let settings = parse(&[
            "--bot-token",
            "123:ABC",
            "--webhook-url",
            "https://bot.example.com/",
        ]);
        assert_eq!(
            settings.webhook_endpoint().unwrap().as_deref(),
            Some("https://bot.example.com/webhook/123:ABC")
        );
    }

    #[test]
    fn test_missing_token() {
        let mut settings = parse(&["--webhook-url", "https://bot.example.com"]);
        settings.bot_token = None;
        assert!(settings.require_token().is_err());
        assert!(settings.webhook_endpoint().is_err());

        settings.webhook_url = None;
        assert!(settings.webhook_endpoint().unwrap().is_none());
    }

    #[test]
    fn test_seed_admin() {
        let mut settings = parse(&["--admin-id", " 42 "]);
        assert_eq!(settings.seed_admin_id(), "42");
        settings.admin_id = None;
        assert_eq!(settings.seed_admin_id(), PLACEHOLDER_ADMIN_ID);
    }
}
