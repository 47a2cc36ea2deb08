//! Message-link extraction and the `MessageReference` triple.
//!
//! A reference is a Discord deep link of the shape
//! `https://discord.com/channels/<guild>/<channel>/<message>`. The pattern
//! requires all three ID segments to be purely numeric, so malformed
//! near-matches never produce a partial reference.

use std::sync::OnceLock;

use regex::Regex;

/// The fixed deep-link shape. All three ID segments must be digits.
const LINK_PATTERN: &str = r"https://discord\.com/channels/\d+/\d+/\d+";

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern compiles"))
}

/// The (guild, channel, message) triple a deep link encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageReference {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageReference {
    pub fn new(guild_id: u64, channel_id: u64, message_id: u64) -> Self {
        Self {
            guild_id,
            channel_id,
            message_id,
        }
    }

    /// Parse a full deep link. Returns `None` for anything that does not
    /// match the link shape exactly.
    pub fn parse_link(link: &str) -> Option<Self> {
        let exact = link_regex()
            .find(link)
            .is_some_and(|m| m.start() == 0 && m.end() == link.len());
        if !exact {
            return None;
        }
        let mut segments = link.rsplit('/');
        let message_id = segments.next()?.parse().ok()?;
        let channel_id = segments.next()?.parse().ok()?;
        let guild_id = segments.next()?.parse().ok()?;
        Some(Self {
            guild_id,
            channel_id,
            message_id,
        })
    }

    /// The canonical deep link for this reference.
    pub fn jump_url(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.guild_id, self.channel_id, self.message_id
        )
    }
}

/// Find every message link in `text`, in order of first occurrence.
///
/// Repeated identical links appear once per occurrence. An empty result
/// means "nothing to expand", not an error.
pub fn find_links(text: &str) -> impl Iterator<Item = &str> {
    link_regex().find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_links_single() {
        let text = "see https://discord.com/channels/10/20/30 for context";
        let links: Vec<_> = find_links(text).collect();
        assert_eq!(links, vec!["https://discord.com/channels/10/20/30"]);
    }

    #[test]
    fn test_find_links_preserves_order_and_duplicates() {
        let text = "https://discord.com/channels/1/2/3 then \
                    https://discord.com/channels/4/5/6 and again \
                    https://discord.com/channels/1/2/3";
        let links: Vec<_> = find_links(text).collect();
        assert_eq!(
            links,
            vec![
                "https://discord.com/channels/1/2/3",
                "https://discord.com/channels/4/5/6",
                "https://discord.com/channels/1/2/3",
            ]
        );
    }

    #[test]
    fn test_find_links_empty_when_no_match() {
        assert_eq!(find_links("no links here").count(), 0);
        // Non-numeric segments never match.
        assert_eq!(
            find_links("https://discord.com/channels/a/b/c").count(),
            0
        );
        // Missing segment never matches.
        assert_eq!(find_links("https://discord.com/channels/1/2").count(), 0);
    }

    #[test]
    fn test_parse_link_valid() {
        let reference =
            MessageReference::parse_link("https://discord.com/channels/10/20/30").unwrap();
        assert_eq!(reference, MessageReference::new(10, 20, 30));
    }

    #[test]
    fn test_parse_link_rejects_malformed() {
        assert!(MessageReference::parse_link("https://discord.com/channels/10/20").is_none());
        assert!(MessageReference::parse_link("https://example.com/channels/1/2/3").is_none());
        assert!(MessageReference::parse_link("not a link").is_none());
        // Embedded matches are not exact links.
        assert!(
            MessageReference::parse_link("see https://discord.com/channels/1/2/3").is_none()
        );
    }

    #[test]
    fn test_jump_url_round_trips() {
        let reference = MessageReference::new(111, 222, 333);
        assert_eq!(
            MessageReference::parse_link(&reference.jump_url()),
            Some(reference)
        );
    }

    #[test]
    fn test_parse_link_large_ids() {
        // Platform IDs span the full 64-bit snowflake range.
        let link = "https://discord.com/channels/18446744073709551615/1/2";
        let reference = MessageReference::parse_link(link).unwrap();
        assert_eq!(reference.guild_id, u64::MAX);
    }
}
