//! CLI commands for relaybot using clap.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use teloxide::Bot;

use crate::access::AccessControl;
use crate::config::Settings;
use crate::core::{AiResponder, Relay};
use crate::providers::create_provider;
use crate::store::StateStore;
use crate::telegram::{self, TelegramMessenger};
use crate::web::{run_server, WebServerConfig, WebState};

/// relaybot - Telegram relay between users and admins with an AI stand-in.
#[derive(Parser)]
#[command(name = "relaybot")]
#[command(version)]
#[command(about = "Relay Telegram users to admins, with optional AI replies", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the webhook server (default)
    Serve,

    /// Register the webhook with Telegram and exit
    SetWebhook,

    /// Show admins, user count and AI settings from the data directory
    Status,
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => serve(&self.settings).await,
            Command::SetWebhook => set_webhook(&self.settings).await,
            Command::Status => status(&self.settings),
        }
    }
}

fn open_store(settings: &Settings) -> Result<Arc<StateStore>> {
    Ok(Arc::new(StateStore::open(
        &settings.data_dir,
        settings.seed_admin_id(),
    )?))
}

async fn serve(settings: &Settings) -> Result<()> {
    let token = settings.require_token()?.to_string();
    let store = open_store(settings)?;
    let bot = Bot::new(token.clone());

    let relay = Relay::new(
        store,
        AccessControl::new(settings.admin_id.clone()),
        Arc::new(TelegramMessenger::new(bot.clone())),
        AiResponder::new(create_provider(settings)),
    );

    // Registration failures are not fatal; the server still answers.
    if let Err(e) = telegram::register_commands(&bot).await {
        tracing::warn!("Failed to set commands: {}", e);
    }
    if let Err(e) = telegram::register_webhook(&bot, settings).await {
        tracing::error!("Failed to set webhook: {}", e);
    }

    let state = Arc::new(WebState {
        relay: Arc::new(relay),
        bot_token: token,
    });
    let config = WebServerConfig {
        port: settings.port,
        host: settings.host.clone(),
    };
    run_server(config, state).await?;
    Ok(())
}

async fn set_webhook(settings: &Settings) -> Result<()> {
    let bot = Bot::new(settings.require_token()?);
    if telegram::register_webhook(&bot, settings).await? {
        println!("Webhook registered.");
    } else {
        anyhow::bail!("WEBHOOK_URL is not set");
    }
    Ok(())
}

fn status(settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let access = AccessControl::new(settings.admin_id.clone());
    let admins = store.load_admins();
    let users = store.load_users();
    let ai = store.load_ai_settings();

    println!("Data directory: {}", store.data_dir().display());
    println!(
        "Primary admin: {}",
        access.primary_admin(&admins).unwrap_or("none")
    );
    println!("Admins: {}", admins.ids().join(", "));
    println!("Users: {}", users.len());
    println!(
        "Users with AI override: {}",
        users.values().filter(|u| u.ai_enabled.is_some()).count()
    );
    println!("AI mode: {}", if ai.enabled { "on" } else { "off" });
    println!("Character: {}", ai.character_prompt);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Commands::parse_from(["relaybot", "--port", "8080"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.settings.port, 8080);

        let cli = Commands::parse_from(["relaybot", "status", "--data-dir", "/tmp/x"]);
        assert_eq!(cli.command, Some(Command::Status));
        assert_eq!(cli.settings.data_dir, std::path::PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_status_reads_store() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        let cli = Commands::parse_from(["relaybot", "status", "--data-dir", data_dir, "--admin-id", "77"]);
        status(&cli.settings).unwrap();
        let store = StateStore::open(dir.path(), "other").unwrap();
        assert_eq!(store.load_admins().ids(), &["77".to_string()]);
    }
}
