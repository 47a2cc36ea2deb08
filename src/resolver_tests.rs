#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::errors::FetchError;
    use crate::reference::MessageReference;
    use crate::resolver::{resolve, MessageStore, Resolution};
    use crate::types::{ChannelView, GuildView, LinkedAuthor, LinkedMessage};

    enum Fail {
        NotFound,
        Forbidden,
        Transport,
    }

    /// In-memory store that counts network fetches.
    struct FakeStore {
        guilds: HashMap<u64, GuildView>,
        channels: HashMap<(u64, u64), ChannelView>,
        messages: HashMap<(u64, u64), LinkedMessage>,
        failures: HashMap<(u64, u64), Fail>,
        fetch_calls: AtomicUsize,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                guilds: HashMap::new(),
                channels: HashMap::new(),
                messages: HashMap::new(),
                failures: HashMap::new(),
                fetch_calls: AtomicUsize::new(0),
            }
        }

        fn with_guild(mut self, id: u64, name: &str) -> Self {
            self.guilds.insert(
                id,
                GuildView {
                    id,
                    name: name.to_string(),
                },
            );
            self
        }

        fn with_channel(mut self, guild_id: u64, id: u64, name: &str) -> Self {
            self.channels.insert(
                (guild_id, id),
                ChannelView {
                    id,
                    name: name.to_string(),
                },
            );
            self
        }

        fn with_message(mut self, message: LinkedMessage) -> Self {
            self.messages
                .insert((message.channel_id, message.id), message);
            self
        }

        fn with_failure(mut self, channel_id: u64, message_id: u64, fail: Fail) -> Self {
            self.failures.insert((channel_id, message_id), fail);
            self
        }
    }

    #[async_trait]
    impl MessageStore for FakeStore {
        fn lookup_guild(&self, guild_id: u64) -> Option<GuildView> {
            self.guilds.get(&guild_id).cloned()
        }

        fn lookup_channel(&self, guild_id: u64, channel_id: u64) -> Option<ChannelView> {
            self.channels.get(&(guild_id, channel_id)).cloned()
        }

        async fn fetch_message(
            &self,
            reference: &MessageReference,
        ) -> Result<LinkedMessage, FetchError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let key = (reference.channel_id, reference.message_id);
            if let Some(fail) = self.failures.get(&key) {
                return Err(match fail {
                    Fail::NotFound => FetchError::NotFound,
                    Fail::Forbidden => FetchError::Forbidden,
                    Fail::Transport => FetchError::Transport("connection reset".to_string()),
                });
            }
            self.messages
                .get(&key)
                .cloned()
                .ok_or(FetchError::NotFound)
        }
    }

    fn message(guild_id: u64, channel_id: u64, id: u64) -> LinkedMessage {
        LinkedMessage {
            id,
            channel_id,
            guild_id,
            author: LinkedAuthor {
                id: 42,
                username: "alice".to_string(),
                global_name: None,
                nick: None,
                avatar_url: "https://cdn.discordapp.com/avatars/42/a.png".to_string(),
                in_guild: true,
            },
            content: "hello".to_string(),
            created_at_secs: 1_700_000_000,
            embeds: vec![],
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let store = FakeStore::new()
            .with_guild(10, "Guild")
            .with_channel(10, 20, "general")
            .with_message(message(10, 20, 30));

        let outcome = resolve(&store, &MessageReference::new(10, 20, 30)).await;
        let Resolution::Found(resolved) = outcome else {
            panic!("expected Found");
        };
        assert_eq!(resolved.guild.name, "Guild");
        assert_eq!(resolved.channel.name, "general");
        assert_eq!(resolved.message.id, 30);
        assert_eq!(resolved.reference, MessageReference::new(10, 20, 30));
    }

    #[tokio::test]
    async fn test_unknown_guild_short_circuits_without_fetch() {
        let store = FakeStore::new()
            .with_channel(10, 20, "general")
            .with_message(message(10, 20, 30));

        let outcome = resolve(&store, &MessageReference::new(10, 20, 30)).await;
        assert_eq!(outcome, Resolution::Unavailable);
        assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_channel_short_circuits_without_fetch() {
        let store = FakeStore::new()
            .with_guild(10, "Guild")
            .with_message(message(10, 20, 30));

        let outcome = resolve(&store, &MessageReference::new(10, 20, 30)).await;
        assert_eq!(outcome, Resolution::Unavailable);
        assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_fetch_failures_collapse_to_unavailable() {
        for fail in [Fail::NotFound, Fail::Forbidden, Fail::Transport] {
            let store = FakeStore::new()
                .with_guild(10, "Guild")
                .with_channel(10, 20, "general")
                .with_failure(20, 30, fail);

            let outcome = resolve(&store, &MessageReference::new(10, 20, 30)).await;
            assert_eq!(outcome, Resolution::Unavailable);
            assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_missing_message_is_unavailable() {
        let store = FakeStore::new()
            .with_guild(10, "Guild")
            .with_channel(10, 20, "general");

        let outcome = resolve(&store, &MessageReference::new(10, 20, 99)).await;
        assert_eq!(outcome, Resolution::Unavailable);
    }
}
