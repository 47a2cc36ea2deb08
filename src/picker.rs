//! Select menu over the message links beyond the first.
//!
//! Every candidate beyond the primary is fully resolved before it is
//! offered; anything unresolvable is silently omitted rather than shown as
//! an error entry. Selection values use an underscore-delimited triple,
//! distinct from the colon-delimited control codec, because they are
//! consumed only by the picker's own handler.

#[path = "picker_tests.rs"]
mod picker_tests;

use std::sync::OnceLock;

use regex::Regex;

use crate::reference::MessageReference;
use crate::resolver::{resolve, MessageStore, Resolution};

/// Component id of the picker select menu.
pub const PICKER_CUSTOM_ID: &str = "link_picker";

/// Raw-match index at which scanning halts: the 27th link in the raw
/// match list is never considered, capping the menu at 25 entries beyond
/// the primary.
pub const PICKER_SCAN_CUTOFF: usize = 26;

const PLACEHOLDER_ACTIVE: &str = "Pick a message";
const PLACEHOLDER_EMPTY: &str = "No other message links";
const INERT_OPTION_LABEL: &str = "Nothing here";

/// Appended to the primary preview when other links are selectable.
pub const MORE_LINKS_NOTE: &str = "\n\nThis message contains multiple links.\n\
    Use the select menu below to expand the others.";

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub label: String,
    pub value: String,
}

/// The select menu to attach to the primary preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub options: Vec<PickerOption>,
    pub placeholder: &'static str,
    pub disabled: bool,
}

impl Picker {
    /// A disabled picker with a single inert option.
    pub fn empty() -> Self {
        Self {
            options: vec![PickerOption {
                label: INERT_OPTION_LABEL.to_string(),
                value: "none".to_string(),
            }],
            placeholder: PLACEHOLDER_EMPTY,
            disabled: true,
        }
    }
}

fn value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)_(\d+)_(\d+)$").expect("picker value pattern compiles"))
}

/// Encode a reference as a selection value, `"{guild}_{channel}_{message}"`.
pub fn encode_value(reference: &MessageReference) -> String {
    format!(
        "{}_{}_{}",
        reference.guild_id, reference.channel_id, reference.message_id
    )
}

/// Decode a selection value back to its reference.
pub fn decode_value(value: &str) -> Option<MessageReference> {
    let caps = value_regex().captures(value)?;
    Some(MessageReference::new(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Build the picker from the full raw match list (primary included at
/// index 0; only indices 1.. are considered).
pub async fn build_picker(store: &dyn MessageStore, matches: &[&str]) -> Picker {
    let mut options = Vec::new();

    for (index, link) in matches.iter().enumerate().skip(1) {
        if index >= PICKER_SCAN_CUTOFF {
            break;
        }
        let Some(reference) = MessageReference::parse_link(link) else {
            continue;
        };
        let Resolution::Found(resolved) = resolve(store, &reference).await else {
            continue;
        };
        options.push(PickerOption {
            label: format!("Posted in #{}", resolved.channel.name),
            value: encode_value(&reference),
        });
    }

    if options.is_empty() {
        Picker::empty()
    } else {
        Picker {
            options,
            placeholder: PLACEHOLDER_ACTIVE,
            disabled: false,
        }
    }
}
