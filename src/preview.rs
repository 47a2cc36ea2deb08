//! Preview rendering: one resolution outcome in, one renderable payload out.
//!
//! Pure over the resolved view types; no network calls happen here. The
//! same `Found` outcome always renders to byte-identical text.

#[path = "preview_tests.rs"]
mod preview_tests;

use crate::controls::{ControlKind, ControlSpec};
use crate::resolver::{Resolution, ResolvedMessage};
use crate::types::LinkedAuthor;

/// Color marker for the unavailable preview.
pub const UNAVAILABLE_COLOR: u32 = 0xE06E64;

/// Shown in place of a body when the linked message has no text content.
pub const NO_CONTENT_PLACEHOLDER: &str = "No content.";

const UNAVAILABLE_TEXT: &str = "**Message not found.**\n\n\
    The bot may not be in the target server, may lack permission to view \
    the message, or the message may have been deleted or never existed.";

const FOOTER_TEXT: &str = "Messages the bot could not fetch are omitted from the menu.";

const EMBEDS_NOTE: &str = "\n\nThis message has embeds.\n\
    Press the button below to show them.";

const IMAGES_NOTE: &str = "\n\nThis message has images.\n\
    Press the button below to show them.";

/// Everything a response needs: a renderable summary plus the buttons to
/// attach. At most two controls, show-embeds before show-images.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPayload {
    pub thumbnail_url: Option<String>,
    pub description: String,
    pub footer: Option<String>,
    pub color: Option<u32>,
    pub controls: Vec<ControlSpec>,
}

/// Render one resolution outcome.
pub fn render(outcome: &Resolution) -> PreviewPayload {
    match outcome {
        Resolution::Unavailable => PreviewPayload {
            thumbnail_url: None,
            description: UNAVAILABLE_TEXT.to_string(),
            footer: None,
            color: Some(UNAVAILABLE_COLOR),
            controls: Vec::new(),
        },
        Resolution::Found(resolved) => render_found(resolved),
    }
}

fn render_found(resolved: &ResolvedMessage) -> PreviewPayload {
    let message = &resolved.message;

    let mut description = format!(
        "Showing the message at {}\n\n\
         **Server:** `{}`\n\
         **Channel:** <#{}>\n\
         **Author:** {}\n\
         **Sent:** <t:{}:F>\n\
         **Content:** {}",
        resolved.reference.jump_url(),
        resolved.guild.name,
        resolved.channel.id,
        author_label(&message.author),
        message.created_at_secs,
        body_text(&message.content),
    );

    let mut controls = Vec::new();
    if !message.embeds.is_empty() {
        controls.push(ControlSpec::new(ControlKind::ShowEmbeds, &resolved.reference));
        description.push_str(EMBEDS_NOTE);
    }
    if !message.attachments.is_empty() {
        controls.push(ControlSpec::new(ControlKind::ShowImages, &resolved.reference));
        description.push_str(IMAGES_NOTE);
    }

    PreviewPayload {
        thumbnail_url: Some(message.author.avatar_url.clone()),
        description,
        footer: Some(FOOTER_TEXT.to_string()),
        color: None,
        controls,
    }
}

/// Wrap the body in a code fence unless it already contains one, or use
/// the placeholder when it is empty.
fn body_text(content: &str) -> String {
    if content.is_empty() {
        NO_CONTENT_PLACEHOLDER.to_string()
    } else if content.contains("```") {
        content.to_string()
    } else {
        format!("```{content}```")
    }
}

/// Author label: members render as `` `name` (mention) `` preferring
/// nickname, then global display name, then account name; authors who have
/// left the guild render as the bare account name with no mention.
fn author_label(author: &LinkedAuthor) -> String {
    if author.in_guild {
        let name = author
            .nick
            .as_deref()
            .or(author.global_name.as_deref())
            .unwrap_or(&author.username);
        format!("`{}` (<@{}>)", name, author.id)
    } else {
        format!("`{}`", author.username)
    }
}
