//! Startup calls to the Telegram Bot API.

use reqwest::Url;
use teloxide::prelude::*;
use teloxide::types::BotCommand;

use crate::config::Settings;
use crate::core::commands::COMMAND_DESCRIPTIONS;
use crate::error::{Error, Result};

/// Point Telegram at our webhook endpoint. Returns false when no
/// `WEBHOOK_URL` is configured.
pub async fn register_webhook(bot: &Bot, settings: &Settings) -> Result<bool> {
    let Some(endpoint) = settings.webhook_endpoint()? else {
        tracing::warn!("WEBHOOK_URL not set. Bot will not receive updates.");
        return Ok(false);
    };

    let url = Url::parse(&endpoint)
        .map_err(|e| Error::Config(format!("Invalid WEBHOOK_URL: {}", e)))?;
    bot.set_webhook(url).await?;

    tracing::info!("Webhook set successfully");
    Ok(true)
}

/// Publish the command list shown in Telegram clients.
pub async fn register_commands(bot: &Bot) -> Result<()> {
    let commands = COMMAND_DESCRIPTIONS
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect::<Vec<_>>();
    bot.set_my_commands(commands).await?;

    tracing::info!("Telegram bot commands set");
    Ok(())
}
