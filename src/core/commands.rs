//! Bot commands.

use crate::error::Result;

use super::message::IncomingMessage;
use super::router::Relay;

pub const NOT_AUTHORIZED: &str = "You are not authorized to use this command.";

const USER_WELCOME: &str = "Welcome to InstantTalkBot! Send any message to chat with me or use /help to see available commands.";

const PRIMARY_ADMIN_WELCOME: &str = r#"Welcome, Primary Admin (Bot Owner)! Available commands:
/addadmin [user_id] - Add a new admin
/removeadmin [user_id] - Remove an admin
/listadmins - List all admin IDs
/aimode [on/off] - Turn AI mode on or off globally
/setcharacter [character description] - Set the AI character/personality

Reply to any forwarded message to respond to the user

As the primary admin, only you can add or remove other admins."#;

const ADMIN_WELCOME: &str = r#"Welcome, Admin! Available commands:
/listadmins - List all admin IDs
/aimode [on/off] - Turn AI mode on or off globally
/setcharacter [character description] - Set the AI character/personality

Reply to any forwarded message to respond to the user

Note: Only the primary admin can add or remove other admins."#;

const ADMIN_HELP: &str = r#"Available commands for admins:
/addadmin [user_id] - Add a new admin (primary admin only)
/removeadmin [user_id] - Remove an admin (primary admin only)
/listadmins - List all admin IDs
/aimode [on/off] - Turn AI mode on or off globally
/setcharacter [character description] - Set the AI character/personality
/ai [on/off] - Turn AI on or off for yourself

Reply to any forwarded message to respond to the user"#;

const USER_HELP: &str = r#"Available commands:
/help - Show this help message
/ai [on/off] - Turn AI responses on or off for yourself
/clear - Clear your conversation history with the AI

Send any message to chat with the AI assistant!"#;

/// A recognized command. `None` arguments mean the arguments were malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    ListAdmins,
    AddAdmin(Option<String>),
    RemoveAdmin(Option<String>),
    AiMode(Option<bool>),
    Ai(Option<bool>),
    SetCharacter(Option<String>),
    Clear,
}

/// Command names and descriptions registered with Telegram.
pub const COMMAND_DESCRIPTIONS: &[(&str, &str)] = &[
    ("start", "Start the bot"),
    ("help", "Show help"),
    ("ai", "Turn AI replies on or off for yourself"),
    ("clear", "Clear your AI conversation history"),
    ("listadmins", "List admins (admins only)"),
    ("aimode", "Turn AI mode on or off globally (admins only)"),
    ("setcharacter", "Set the AI character (admins only)"),
    ("addadmin", "Add an admin (primary admin only)"),
    ("removeadmin", "Remove an admin (primary admin only)"),
];

impl Command {
    /// Parse `/name[@bot] args`. Unknown commands and plain text give `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or(head);

        let command = match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "listadmins" => Command::ListAdmins,
            "addadmin" => Command::AddAdmin(single_arg(args).filter(|id| is_user_id(id))),
            "removeadmin" => Command::RemoveAdmin(single_arg(args)),
            "aimode" => Command::AiMode(single_arg(args).and_then(|a| parse_switch(&a))),
            "ai" => Command::Ai(single_arg(args).and_then(|a| parse_switch(&a))),
            "setcharacter" => {
                Command::SetCharacter(Some(args.to_string()).filter(|a| !a.is_empty()))
            }
            "clear" => Command::Clear,
            _ => return None,
        };
        Some(command)
    }
}

fn single_arg(args: &str) -> Option<String> {
    let mut parts = args.split_whitespace();
    let first = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(first.to_string())
}

fn is_user_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

fn parse_switch(arg: &str) -> Option<bool> {
    match arg.to_lowercase().as_str() {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "ON"
    } else {
        "OFF"
    }
}

impl Relay {
    pub(super) async fn handle_command(&self, command: Command, msg: &IncomingMessage) -> Result<()> {
        let sender_id = msg.sender.id.as_str();
        let admins = self.store.load_admins();
        let is_admin = self.access.is_admin(&admins, sender_id);
        let is_primary = is_admin && self.access.is_primary_admin(&admins, sender_id);

        match command {
            Command::Start => {
                if is_primary {
                    self.reply(msg, PRIMARY_ADMIN_WELCOME).await
                } else if is_admin {
                    self.reply(msg, ADMIN_WELCOME).await
                } else {
                    self.register(&msg.sender);
                    self.reply(msg, USER_WELCOME).await
                }
            }
            Command::Help => {
                let help = if is_admin { ADMIN_HELP } else { USER_HELP };
                self.reply(msg, help).await
            }
            Command::ListAdmins => {
                if !is_admin {
                    return self.reply(msg, NOT_AUTHORIZED).await;
                }
                let primary = self.access.primary_admin(&admins);
                let mut list = String::from("👑 Admin List:\n\n");
                for (index, id) in admins.ids().iter().enumerate() {
                    if primary == Some(id.as_str()) {
                        list.push_str(&format!(
                            "{}. {} (Primary Admin/Bot Owner) 👑\n",
                            index + 1,
                            id
                        ));
                    } else {
                        list.push_str(&format!("{}. {}\n", index + 1, id));
                    }
                }
                list.push_str("\nOnly the primary admin can add or remove other admins.");
                self.reply(msg, &list).await
            }
            Command::AddAdmin(target) => {
                if !is_admin {
                    return self.reply(msg, NOT_AUTHORIZED).await;
                }
                let Some(target) = target else {
                    return self.reply(msg, "Usage: /addadmin [user_id]").await;
                };
                if !is_primary {
                    return self
                        .reply(msg, "Only the primary admin (bot owner) can add new admins.")
                        .await;
                }
                match self.store.update_admins(|a| a.add(&target))? {
                    Ok(()) => {
                        tracing::info!("Admin {} added by {}", target, sender_id);
                        self.reply(msg, &format!("User {} has been added as an admin.", target))
                            .await
                    }
                    Err(reason) => self.reply(msg, &reason.to_string()).await,
                }
            }
            Command::RemoveAdmin(target) => {
                if !is_admin {
                    return self.reply(msg, NOT_AUTHORIZED).await;
                }
                let Some(target) = target else {
                    return self.reply(msg, "Usage: /removeadmin [user_id]").await;
                };
                if !is_primary {
                    return self
                        .reply(msg, "Only the primary admin (bot owner) can remove admins.")
                        .await;
                }
                let primary = self.access.primary_admin(&admins).map(str::to_string);
                match self
                    .store
                    .update_admins(|a| a.remove(&target, primary.as_deref()))?
                {
                    Ok(()) => {
                        tracing::info!("Admin {} removed by {}", target, sender_id);
                        self.reply(msg, &format!("User {} has been removed from admins.", target))
                            .await
                    }
                    Err(reason) => self.reply(msg, &reason.to_string()).await,
                }
            }
            Command::AiMode(enabled) => {
                if !is_admin {
                    return self.reply(msg, NOT_AUTHORIZED).await;
                }
                let Some(enabled) = enabled else {
                    return self.reply(msg, "Usage: /aimode [on/off]").await;
                };
                self.store.update_ai_settings(|s| s.enabled = enabled)?;
                tracing::info!("Global AI mode set to {} by {}", on_off(enabled), sender_id);
                self.reply(
                    msg,
                    &format!("AI mode has been turned {} globally.", on_off(enabled)),
                )
                .await
            }
            Command::Ai(enabled) => {
                let Some(enabled) = enabled else {
                    return self.reply(msg, "Usage: /ai [on/off]").await;
                };
                self.store.set_user_ai_enabled(sender_id, enabled)?;
                self.reply(
                    msg,
                    &format!("AI responses for you have been turned {}.", on_off(enabled)),
                )
                .await
            }
            Command::SetCharacter(prompt) => {
                if !is_admin {
                    return self.reply(msg, NOT_AUTHORIZED).await;
                }
                let Some(prompt) = prompt else {
                    return self
                        .reply(msg, "Usage: /setcharacter [character description]")
                        .await;
                };
                self.store
                    .update_ai_settings(|s| s.character_prompt = prompt)?;
                tracing::info!("AI character updated by {}", sender_id);
                self.reply(msg, "AI character has been updated!").await
            }
            Command::Clear => {
                if self.responder.conversations().clear(sender_id).await {
                    self.reply(msg, "Your conversation history with the AI has been cleared.")
                        .await
                } else {
                    self.reply(msg, "You have no conversation history to clear.")
                        .await
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{harness, text_from};

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help@relay_bot"), Some(Command::Help));
        assert_eq!(
            Command::parse("/addadmin 123"),
            Some(Command::AddAdmin(Some("123".to_string())))
        );
        assert_eq!(Command::parse("/addadmin"), Some(Command::AddAdmin(None)));
        assert_eq!(Command::parse("/addadmin 1 2"), Some(Command::AddAdmin(None)));
        assert_eq!(Command::parse("/addadmin bob"), Some(Command::AddAdmin(None)));
        assert_eq!(Command::parse("/aimode ON"), Some(Command::AiMode(Some(true))));
        assert_eq!(Command::parse("/ai maybe"), Some(Command::Ai(None)));
        assert_eq!(
            Command::parse("/setcharacter  A grumpy\npirate "),
            Some(Command::SetCharacter(Some("A grumpy\npirate".to_string())))
        );
        assert_eq!(Command::parse("/setcharacter"), Some(Command::SetCharacter(None)));
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("hello /start"), None);
    }

    #[tokio::test]
    async fn test_remove_only_admin_rejected() {
        let h = harness(&["100"]);
        h.relay.handle(&text_from("100", "/removeadmin 100")).await.unwrap();
        assert_eq!(h.messenger.texts_to("100"), vec!["Cannot remove the last admin."]);
        assert!(h.relay.store().load_admins().contains("100"));
    }

    #[tokio::test]
    async fn test_admin_management_by_primary() {
        let h = harness(&["100"]);
        h.relay.handle(&text_from("100", "/addadmin 200")).await.unwrap();
        h.relay.handle(&text_from("100", "/addadmin 200")).await.unwrap();
        h.relay.handle(&text_from("100", "/removeadmin 100")).await.unwrap();
        h.relay.handle(&text_from("100", "/removeadmin 300")).await.unwrap();

        assert_eq!(
            h.messenger.texts_to("100"),
            vec![
                "User 200 has been added as an admin.",
                "This user is already an admin.",
                "Cannot remove the primary admin (bot owner).",
                "Admin not found.",
            ]
        );

        // A secondary admin cannot manage admins.
        h.relay.handle(&text_from("200", "/removeadmin 100")).await.unwrap();
        h.relay.handle(&text_from("200", "/addadmin 300")).await.unwrap();
        assert_eq!(
            h.messenger.texts_to("200"),
            vec![
                "Only the primary admin (bot owner) can remove admins.",
                "Only the primary admin (bot owner) can add new admins.",
            ]
        );

        h.relay.handle(&text_from("100", "/removeadmin 200")).await.unwrap();
        let admins = h.relay.store().load_admins();
        assert_eq!(admins.ids(), &["100".to_string()]);
    }

    #[tokio::test]
    async fn test_regular_user_is_not_authorized() {
        let h = harness(&["100"]);
        for cmd in ["/listadmins", "/aimode off", "/setcharacter pirate", "/addadmin 5"] {
            h.relay.handle(&text_from("42", cmd)).await.unwrap();
        }
        assert_eq!(h.messenger.texts_to("42"), vec![NOT_AUTHORIZED; 4]);
        assert!(h.relay.store().load_ai_settings().enabled);
    }

    #[tokio::test]
    async fn test_global_toggle_respects_override() {
        let h = harness(&["100"]);
        h.relay.handle(&text_from("42", "/ai on")).await.unwrap();
        h.relay.handle(&text_from("100", "/aimode off")).await.unwrap();

        assert_eq!(
            h.messenger.texts_to("42"),
            vec!["AI responses for you have been turned ON."]
        );
        assert_eq!(
            h.messenger.texts_to("100"),
            vec!["AI mode has been turned OFF globally."]
        );
        assert!(h.relay.store().ai_enabled_for("42"));
        assert!(!h.relay.store().ai_enabled_for("43"));
    }

    #[tokio::test]
    async fn test_setcharacter_reaches_provider() {
        let h = harness(&["100"]);
        h.relay
            .handle(&text_from("100", "/setcharacter You are a pirate"))
            .await
            .unwrap();
        h.relay.handle(&text_from("42", "ahoy")).await.unwrap();

        assert_eq!(h.provider.requests()[0].0, "You are a pirate");
    }

    #[tokio::test]
    async fn test_clear_twice() {
        let h = harness(&["100"]);
        h.relay.handle(&text_from("42", "hello")).await.unwrap();
        h.relay.handle(&text_from("42", "/clear")).await.unwrap();
        h.relay.handle(&text_from("42", "/clear")).await.unwrap();

        let texts = h.messenger.texts_to("42");
        assert_eq!(texts[1], "Your conversation history with the AI has been cleared.");
        assert_eq!(texts[2], "You have no conversation history to clear.");
        assert_eq!(h.relay.responder().conversations().len("42").await, 0);
    }

    #[tokio::test]
    async fn test_list_admins_marks_primary() {
        let h = harness(&["100", "200"]);
        h.relay.handle(&text_from("200", "/listadmins")).await.unwrap();
        let list = &h.messenger.texts_to("200")[0];
        assert!(list.contains("1. 100 (Primary Admin/Bot Owner)"));
        assert!(list.contains("2. 200\n"));
    }

    #[tokio::test]
    async fn test_usage_errors() {
        let h = harness(&["100"]);
        for cmd in ["/addadmin", "/removeadmin", "/aimode", "/ai sometimes", "/setcharacter"] {
            h.relay.handle(&text_from("100", cmd)).await.unwrap();
        }
        let texts = h.messenger.texts_to("100");
        assert_eq!(texts.len(), 5);
        assert!(texts.iter().all(|t| t.starts_with("Usage: ")));
    }
}
