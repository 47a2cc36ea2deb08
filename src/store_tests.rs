#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::errors::FetchError;
    use crate::store::{member_state, MemberDirectory, MemberEntry};

    /// Directory with a cache layer and a remote layer, counting remote
    /// fetches so tests can assert cache hits never go to the network.
    struct FakeDirectory {
        cached: HashMap<u64, MemberEntry>,
        remote: HashMap<u64, MemberEntry>,
        remote_error: Option<FetchError>,
        fetch_calls: AtomicUsize,
    }

    impl FakeDirectory {
        fn new() -> Self {
            Self {
                cached: HashMap::new(),
                remote: HashMap::new(),
                remote_error: None,
                fetch_calls: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MemberDirectory for FakeDirectory {
        fn cached_member(&self, _guild_id: u64, user_id: u64) -> Option<MemberEntry> {
            self.cached.get(&user_id).cloned()
        }

        async fn fetch_member(
            &self,
            _guild_id: u64,
            user_id: u64,
        ) -> Result<MemberEntry, FetchError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.remote_error {
                return Err(match err {
                    FetchError::NotFound => FetchError::NotFound,
                    FetchError::Forbidden => FetchError::Forbidden,
                    FetchError::Transport(msg) => FetchError::Transport(msg.clone()),
                });
            }
            self.remote.get(&user_id).cloned().ok_or(FetchError::NotFound)
        }
    }

    fn entry(nick: Option<&str>) -> MemberEntry {
        MemberEntry {
            nick: nick.map(String::from),
        }
    }

    #[tokio::test]
    async fn cached_member_skips_the_network() {
        let mut directory = FakeDirectory::new();
        directory.cached.insert(42, entry(Some("moderator")));

        let (in_guild, nick) = member_state(&directory, 1, 42).await;

        assert!(in_guild);
        assert_eq!(nick.as_deref(), Some("moderator"));
        assert_eq!(directory.fetches(), 0);
    }

    #[tokio::test]
    async fn uncached_member_is_confirmed_over_http() {
        let mut directory = FakeDirectory::new();
        directory.remote.insert(42, entry(None));

        let (in_guild, nick) = member_state(&directory, 1, 42).await;

        assert!(in_guild);
        assert_eq!(nick, None);
        assert_eq!(directory.fetches(), 1);
    }

    #[tokio::test]
    async fn departed_member_reported_out_of_guild() {
        let directory = FakeDirectory::new();

        let (in_guild, nick) = member_state(&directory, 1, 42).await;

        assert!(!in_guild);
        assert_eq!(nick, None);
        assert_eq!(directory.fetches(), 1);
    }

    #[tokio::test]
    async fn member_lookup_transport_failure_drops_to_bare_label() {
        let mut directory = FakeDirectory::new();
        directory.remote.insert(42, entry(Some("moderator")));
        directory.remote_error = Some(FetchError::Transport("timeout".into()));

        let (in_guild, nick) = member_state(&directory, 1, 42).await;

        assert!(!in_guild);
        assert_eq!(nick, None);
    }
}
