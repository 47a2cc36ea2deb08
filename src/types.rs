//! Read-only views of Discord entities used by the preview pipeline.
//!
//! These are plain serde types decoupled from serenity's models so that the
//! resolver, renderer, and picker can be exercised in tests without a live
//! gateway connection. The `store` module converts serenity models into them.

use serde::{Deserialize, Serialize};

/// A guild as seen through the cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuildView {
    pub id: u64,
    pub name: String,
}

/// A guild channel as seen through the cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelView {
    pub id: u64,
    pub name: String,
}

/// The author of a linked message, with membership state resolved against
/// the message's parent guild.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedAuthor {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    /// Guild nickname; only populated when the author is still a member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// Effective avatar URL (account avatar or default).
    pub avatar_url: String,
    /// Whether the author is still a member of the message's guild.
    pub in_guild: bool,
}

/// Message attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size: u64,
}

/// Embed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed footer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed image or thumbnail (just a URL)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedMedia {
    pub url: String,
}

/// A rich embed carried by a linked message. Re-sent verbatim when the
/// show-embeds button is pressed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    /// ISO 8601 timestamp string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A message fetched through a link, reduced to what the preview needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: u64,
    pub author: LinkedAuthor,
    pub content: String,
    /// Creation instant as epoch seconds in UTC.
    pub created_at_secs: i64,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
