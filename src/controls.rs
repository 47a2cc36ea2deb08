//! Durable button controls and their custom-id codec.
//!
//! A button's `custom_id` carries everything needed to rebuild it after a
//! process restart: a kind tag plus the colon-delimited reference triple.
//! Activation re-resolves the reference from scratch; no in-memory table
//! maps identifiers to data, the message store is the source of truth.

#[path = "controls_tests.rs"]
mod controls_tests;

use std::sync::OnceLock;

use regex::Regex;

use crate::reference::MessageReference;
use crate::types::{Embed, EmbedMedia, LinkedMessage};

/// The two drill-down buttons a preview can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    ShowEmbeds,
    ShowImages,
}

impl ControlKind {
    pub fn tag(self) -> &'static str {
        match self {
            ControlKind::ShowEmbeds => "show_embeds",
            ControlKind::ShowImages => "show_images",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "show_embeds" => Some(ControlKind::ShowEmbeds),
            "show_images" => Some(ControlKind::ShowImages),
            _ => None,
        }
    }

    pub fn emoji(self) -> char {
        match self {
            ControlKind::ShowEmbeds => '📦',
            ControlKind::ShowImages => '🖼',
        }
    }
}

/// A button to attach to a preview response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSpec {
    pub kind: ControlKind,
    pub custom_id: String,
}

impl ControlSpec {
    pub fn new(kind: ControlKind, reference: &MessageReference) -> Self {
        Self {
            kind,
            custom_id: encode_custom_id(kind, reference),
        }
    }
}

fn custom_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(show_embeds|show_images):(\d+):(\d+):(\d+)$")
            .expect("custom id pattern compiles")
    })
}

/// Encode a control identity as `"{tag}:{guild}:{channel}:{message}"`.
pub fn encode_custom_id(kind: ControlKind, reference: &MessageReference) -> String {
    format!(
        "{}:{}:{}:{}",
        kind.tag(),
        reference.guild_id,
        reference.channel_id,
        reference.message_id
    )
}

/// Match an incoming component `custom_id` back to its kind and reference.
///
/// Returns `None` for anything not produced by [`encode_custom_id`], which
/// lets the interaction router fall through to other components.
pub fn decode_custom_id(custom_id: &str) -> Option<(ControlKind, MessageReference)> {
    let caps = custom_id_regex().captures(custom_id)?;
    let kind = ControlKind::from_tag(&caps[1])?;
    let reference = MessageReference::new(
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
        caps[4].parse().ok()?,
    );
    Some((kind, reference))
}

/// Behavior behind a button press: turn the freshly re-resolved message
/// into the embeds to send. One implementation per control kind.
pub trait ControlAction: Send + Sync {
    fn kind(&self) -> ControlKind;
    fn respond(&self, message: &LinkedMessage) -> Vec<Embed>;
}

struct ShowEmbedsAction;

impl ControlAction for ShowEmbedsAction {
    fn kind(&self) -> ControlKind {
        ControlKind::ShowEmbeds
    }

    /// The linked message's rich embeds, verbatim.
    fn respond(&self, message: &LinkedMessage) -> Vec<Embed> {
        message.embeds.clone()
    }
}

struct ShowImagesAction;

impl ControlAction for ShowImagesAction {
    fn kind(&self) -> ControlKind {
        ControlKind::ShowImages
    }

    /// One image-bearing embed per attachment.
    fn respond(&self, message: &LinkedMessage) -> Vec<Embed> {
        message
            .attachments
            .iter()
            .map(|attachment| Embed {
                image: Some(EmbedMedia {
                    url: attachment.url.clone(),
                }),
                ..Embed::default()
            })
            .collect()
    }
}

/// Look up the action for a decoded control kind.
pub fn action_for(kind: ControlKind) -> &'static dyn ControlAction {
    match kind {
        ControlKind::ShowEmbeds => &ShowEmbedsAction,
        ControlKind::ShowImages => &ShowImagesAction,
    }
}
