//! Serenity-backed message store and model conversions.
//!
//! Guild and channel lookups read the gateway cache only; the message
//! fetch, plus a member fetch when the author is missing from the cache,
//! are the network calls in the pipeline. Conversions between serenity
//! models, the crate's view types, and response builders all live here so
//! nothing else touches serenity's data model.

#[path = "store_tests.rs"]
mod store_tests;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::timestamp::Timestamp;
use tracing::debug;

use crate::errors::{classify_fetch, FetchError};
use crate::preview::PreviewPayload;
use crate::reference::MessageReference;
use crate::resolver::MessageStore;
use crate::types::{
    Attachment, ChannelView, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia, GuildView,
    LinkedAuthor, LinkedMessage,
};

/// Message store backed by the live serenity cache and HTTP client.
pub struct SerenityStore {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl SerenityStore {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        Self { cache, http }
    }

    fn convert_message(
        &self,
        reference: &MessageReference,
        msg: &Message,
        in_guild: bool,
        nick: Option<String>,
    ) -> LinkedMessage {
        LinkedMessage {
            id: msg.id.get(),
            channel_id: reference.channel_id,
            guild_id: reference.guild_id,
            author: LinkedAuthor {
                id: msg.author.id.get(),
                username: msg.author.name.clone(),
                global_name: msg.author.global_name.as_deref().map(String::from),
                nick,
                avatar_url: msg.author.face(),
                in_guild,
            },
            content: msg.content.clone(),
            created_at_secs: msg.timestamp.unix_timestamp(),
            embeds: msg.embeds.iter().map(convert_embed).collect(),
            attachments: msg
                .attachments
                .iter()
                .map(|a| Attachment {
                    id: a.id.get(),
                    filename: a.filename.clone(),
                    url: a.url.clone(),
                    content_type: a.content_type.clone(),
                    size: a.size as u64,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl MessageStore for SerenityStore {
    fn lookup_guild(&self, guild_id: u64) -> Option<GuildView> {
        let guild = self.cache.guild(GuildId::new(guild_id))?;
        Some(GuildView {
            id: guild_id,
            name: guild.name.clone(),
        })
    }

    fn lookup_channel(&self, guild_id: u64, channel_id: u64) -> Option<ChannelView> {
        let guild = self.cache.guild(GuildId::new(guild_id))?;
        let channel = guild.channels.get(&ChannelId::new(channel_id))?;
        Some(ChannelView {
            id: channel_id,
            name: channel.name.clone(),
        })
    }

    async fn fetch_message(
        &self,
        reference: &MessageReference,
    ) -> Result<LinkedMessage, FetchError> {
        let message = self
            .http
            .get_message(
                ChannelId::new(reference.channel_id),
                MessageId::new(reference.message_id),
            )
            .await
            .map_err(classify_fetch)?;
        let (in_guild, nick) =
            member_state(self, reference.guild_id, message.author.id.get()).await;
        Ok(self.convert_message(reference, &message, in_guild, nick))
    }
}

/// A guild member as far as the author label cares: just the nickname.
#[derive(Debug, Clone)]
pub struct MemberEntry {
    pub nick: Option<String>,
}

/// Member lookup seam for the author-label membership check.
///
/// The gateway cache only carries the members delivered at GUILD_CREATE
/// plus those seen in member events since, so a cache miss does not mean
/// the author left. A miss is confirmed over HTTP before the label drops
/// the mention.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    fn cached_member(&self, guild_id: u64, user_id: u64) -> Option<MemberEntry>;

    async fn fetch_member(&self, guild_id: u64, user_id: u64) -> Result<MemberEntry, FetchError>;
}

#[async_trait]
impl MemberDirectory for SerenityStore {
    fn cached_member(&self, guild_id: u64, user_id: u64) -> Option<MemberEntry> {
        let guild = self.cache.guild(GuildId::new(guild_id))?;
        let member = guild.members.get(&UserId::new(user_id))?;
        Some(MemberEntry {
            nick: member.nick.clone(),
        })
    }

    async fn fetch_member(&self, guild_id: u64, user_id: u64) -> Result<MemberEntry, FetchError> {
        let member = self
            .http
            .get_member(GuildId::new(guild_id), UserId::new(user_id))
            .await
            .map_err(classify_fetch)?;
        Ok(MemberEntry {
            nick: member.nick.clone(),
        })
    }
}

/// Membership state for the author: whether they are still in the guild,
/// and their nickname if so. Only an HTTP 404 counts as departed; a
/// transport failure keeps the bare-name label without claiming departure.
pub async fn member_state(
    directory: &dyn MemberDirectory,
    guild_id: u64,
    user_id: u64,
) -> (bool, Option<String>) {
    if let Some(entry) = directory.cached_member(guild_id, user_id) {
        return (true, entry.nick);
    }
    match directory.fetch_member(guild_id, user_id).await {
        Ok(entry) => (true, entry.nick),
        Err(FetchError::NotFound) => (false, None),
        Err(err) => {
            debug!(guild_id, user_id, error = %err, "Member lookup failed");
            (false, None)
        }
    }
}

fn convert_embed(embed: &serenity::model::channel::Embed) -> Embed {
    Embed {
        title: embed.title.clone(),
        description: embed.description.clone(),
        url: embed.url.clone(),
        fields: embed
            .fields
            .iter()
            .map(|f| EmbedField {
                name: f.name.clone(),
                value: f.value.clone(),
                inline: f.inline,
            })
            .collect(),
        color: embed.colour.map(|c| c.0),
        author: embed.author.as_ref().map(|a| EmbedAuthor {
            name: a.name.clone(),
            url: a.url.clone(),
            icon_url: a.icon_url.clone(),
        }),
        footer: embed.footer.as_ref().map(|f| EmbedFooter {
            text: f.text.clone(),
            icon_url: f.icon_url.clone(),
        }),
        image: embed.image.as_ref().map(|i| EmbedMedia { url: i.url.clone() }),
        thumbnail: embed.thumbnail.as_ref().map(|t| EmbedMedia { url: t.url.clone() }),
        timestamp: embed.timestamp.and_then(|t| t.to_rfc3339()),
    }
}

/// Rebuild a stored embed for re-sending, field for field.
pub fn embed_builder(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(url) = &embed.url {
        builder = builder.url(url);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(color) = embed.color {
        builder = builder.colour(color);
    }
    if let Some(author) = &embed.author {
        let mut a = CreateEmbedAuthor::new(&author.name);
        if let Some(url) = &author.url {
            a = a.url(url);
        }
        if let Some(icon_url) = &author.icon_url {
            a = a.icon_url(icon_url);
        }
        builder = builder.author(a);
    }
    if let Some(footer) = &embed.footer {
        let mut f = CreateEmbedFooter::new(&footer.text);
        if let Some(icon_url) = &footer.icon_url {
            f = f.icon_url(icon_url);
        }
        builder = builder.footer(f);
    }
    if let Some(image) = &embed.image {
        builder = builder.image(&image.url);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(&thumbnail.url);
    }
    if let Some(timestamp) = &embed.timestamp {
        if let Ok(ts) = Timestamp::parse(timestamp) {
            builder = builder.timestamp(ts);
        }
    }
    builder
}

/// Turn a rendered preview into its response embed.
pub fn preview_embed(payload: &PreviewPayload) -> CreateEmbed {
    let mut builder = CreateEmbed::new().description(&payload.description);
    if let Some(thumbnail) = &payload.thumbnail_url {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(footer) = &payload.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(color) = payload.color {
        builder = builder.colour(color);
    }
    builder
}
