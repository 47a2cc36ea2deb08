//! Three-level reference resolution: guild → channel → message.
//!
//! The cache may hold a guild without its channel list, or a channel the
//! bot can no longer fetch messages from, so each level fails
//! independently and short-circuits. Every failure cause (not visible,
//! deleted, forbidden, transport) collapses to [`Resolution::Unavailable`];
//! the caller presents identical guidance text regardless of cause.

#[path = "resolver_tests.rs"]
mod resolver_tests;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::FetchError;
use crate::reference::MessageReference;
use crate::types::{ChannelView, GuildView, LinkedMessage};

/// Capability seam over the external message store.
///
/// Guild and channel lookups are cache-backed and synchronous; only the
/// message fetch goes to the network. Handed in rather than reached for
/// globally so the pipeline can be tested against an in-memory fake.
#[async_trait]
pub trait MessageStore: Send + Sync {
    fn lookup_guild(&self, guild_id: u64) -> Option<GuildView>;
    fn lookup_channel(&self, guild_id: u64, channel_id: u64) -> Option<ChannelView>;
    async fn fetch_message(
        &self,
        reference: &MessageReference,
    ) -> Result<LinkedMessage, FetchError>;
}

/// A fully dereferenced message together with its parent guild and channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMessage {
    pub reference: MessageReference,
    pub guild: GuildView,
    pub channel: ChannelView,
    pub message: LinkedMessage,
}

/// Outcome of resolving one reference. Deliberately two variants: the
/// renderer shows the same guidance text for every failure cause, so a
/// richer error enum would only leak internal state.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Box<ResolvedMessage>),
    Unavailable,
}

/// Resolve a reference against the store.
///
/// Guild and channel lookups are cache-only; when either misses, no
/// network call is made.
pub async fn resolve(store: &dyn MessageStore, reference: &MessageReference) -> Resolution {
    let Some(guild) = store.lookup_guild(reference.guild_id) else {
        debug!(guild_id = reference.guild_id, "guild not in cache");
        return Resolution::Unavailable;
    };

    let Some(channel) = store.lookup_channel(reference.guild_id, reference.channel_id) else {
        debug!(
            guild_id = reference.guild_id,
            channel_id = reference.channel_id,
            "channel not in cache"
        );
        return Resolution::Unavailable;
    };

    match store.fetch_message(reference).await {
        Ok(message) => Resolution::Found(Box::new(ResolvedMessage {
            reference: *reference,
            guild,
            channel,
            message,
        })),
        Err(err) => {
            debug!(
                message_id = reference.message_id,
                error = %err,
                "message fetch failed"
            );
            Resolution::Unavailable
        }
    }
}
