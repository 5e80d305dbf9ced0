//! Forwarding to the admin pool and footer correlation of admin replies.

use std::sync::OnceLock;

use regex::Regex;

use crate::store::AdminSet;
use crate::telegram::Messenger;

use super::message::{Media, MediaKind, Sender};

/// Label that precedes the originating user's id in forwarded messages.
pub const FOOTER_LABEL: &str = "User ID:";

fn footer_regex() -> &'static Regex {
    static FOOTER: OnceLock<Regex> = OnceLock::new();
    FOOTER.get_or_init(|| Regex::new(r"User ID: (\d+)").expect("footer pattern is valid"))
}

/// Recover the target user id from the footer of a forwarded message.
pub fn extract_target_user(text: &str) -> Option<String> {
    footer_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn footer(sender: &Sender) -> String {
    format!("{} {}", FOOTER_LABEL, sender.id)
}

/// Admin-facing copy of a user's text message.
pub fn format_text_forward(sender: &Sender, text: &str) -> String {
    format!(
        "Message from {} (@{}):\n\n{}\n\n{}",
        sender.display_name(),
        sender.handle(),
        text,
        footer(sender)
    )
}

/// Caption (or, for stickers, follow-up text) identifying a media sender.
pub fn format_media_caption(sender: &Sender, media: &Media) -> String {
    match media.kind {
        MediaKind::Voice | MediaKind::Sticker => format!(
            "{} from {} (@{})\n\n{}",
            media.kind.label(),
            sender.display_name(),
            sender.handle(),
            footer(sender)
        ),
        _ => format!(
            "{} from {} (@{}):\n\n{}\n\n{}",
            media.kind.label(),
            sender.display_name(),
            sender.handle(),
            media.caption.as_deref().unwrap_or("No caption"),
            footer(sender)
        ),
    }
}

/// Send a copy of a user's text to every admin. Failures are logged per
/// admin and never stop delivery to the rest. Returns the number delivered.
pub async fn forward_text(
    messenger: &dyn Messenger,
    admins: &AdminSet,
    sender: &Sender,
    text: &str,
) -> usize {
    let body = format_text_forward(sender, text);
    let mut delivered = 0;
    for admin_id in admins.ids() {
        match messenger.send_text(admin_id, &body).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::error!("Failed to forward message to admin {}: {}", admin_id, e);
            }
        }
    }
    delivered
}

/// Send a user's media to every admin with an identifying caption.
/// Stickers cannot carry captions, so the identification follows as text.
pub async fn forward_media(
    messenger: &dyn Messenger,
    admins: &AdminSet,
    sender: &Sender,
    media: &Media,
) -> usize {
    let caption = format_media_caption(sender, media);
    let mut delivered = 0;
    for admin_id in admins.ids() {
        let result = if media.kind.supports_caption() {
            messenger.send_media(admin_id, media, Some(&caption)).await
        } else {
            match messenger.send_media(admin_id, media, None).await {
                Ok(()) => messenger.send_text(admin_id, &caption).await,
                Err(e) => Err(e),
            }
        };
        match result {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::error!("Failed to forward media to admin {}: {}", admin_id, e);
            }
        }
    }
    delivered
}
