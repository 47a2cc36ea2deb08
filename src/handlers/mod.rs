//! Serenity event handler: command registration and interaction routing.
//!
//! Every activation defers an ephemeral response before any network
//! round-trip, then delivers the result as a followup. Buttons and the
//! select menu are routed purely off their `custom_id`s, so activations
//! arriving after a process restart dispatch exactly like fresh ones.

use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::{
    CreateActionRow, CreateButton, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption,
};
use serenity::model::application::{
    ButtonStyle, CommandInteraction, CommandType, ComponentInteraction,
    ComponentInteractionDataKind, Interaction, ResolvedTarget,
};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use tracing::{error, info, warn};

use crate::access::OperatorConfig;
use crate::controls::{action_for, decode_custom_id, ControlKind, ControlSpec};
use crate::health::HealthState;
use crate::picker::{build_picker, decode_value, Picker, MORE_LINKS_NOTE, PICKER_CUSTOM_ID};
use crate::preview::render;
use crate::reference::{find_links, MessageReference};
use crate::resolver::{resolve, Resolution};
use crate::store::{embed_builder, preview_embed, SerenityStore};

/// Display name of the message context-menu command.
pub const EXPAND_COMMAND_NAME: &str = "Expand message link";

const NO_LINKS_NOTICE: &str = "### No message links found";
const NOT_PERMITTED_NOTICE: &str = "You are not permitted to use this command.";
const NOTHING_SELECTED_NOTICE: &str = "Nothing to expand here.";

/// Process-wide bot state shared with handlers through the client TypeMap.
pub struct App {
    pub home_guild_id: u64,
    pub operators: OperatorConfig,
}

impl TypeMapKey for App {
    type Value = Arc<App>;
}

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected as {} ({})", ready.user.name, ready.user.id);

        let (app, health) = {
            let data = ctx.data.read().await;
            (
                data.get::<App>().cloned(),
                data.get::<HealthState>().cloned(),
            )
        };

        if let Some(health) = &health {
            health.set_bot_username(ready.user.name.clone()).await;
        }

        let Some(app) = app else {
            error!("App state not found in context data");
            return;
        };

        // Idempotent guild-scoped registration; the command is never
        // visible outside the home guild.
        let command = CreateCommand::new(EXPAND_COMMAND_NAME).kind(CommandType::Message);
        match GuildId::new(app.home_guild_id)
            .set_commands(&ctx.http, vec![command])
            .await
        {
            Ok(commands) => {
                info!(
                    "Registered {} command(s) on guild {}",
                    commands.len(),
                    app.home_guild_id
                );
                if let Some(health) = &health {
                    health.set_commands_registered().await;
                }
            }
            Err(e) => error!("Failed to register guild commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(cmd) if cmd.data.name == EXPAND_COMMAND_NAME => {
                handle_expand(&ctx, &cmd).await;
            }
            Interaction::Component(comp) => match &comp.data.kind {
                ComponentInteractionDataKind::StringSelect { values }
                    if comp.data.custom_id == PICKER_CUSTOM_ID =>
                {
                    let values = values.clone();
                    handle_pick(&ctx, &comp, &values).await;
                }
                ComponentInteractionDataKind::Button => {
                    match decode_custom_id(&comp.data.custom_id) {
                        Some((kind, reference)) => {
                            handle_control(&ctx, &comp, kind, reference).await;
                        }
                        None => {
                            warn!("Unrecognized button custom_id: {}", comp.data.custom_id);
                        }
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }
}

/// Entry point: parse the target message, render the first link, wire up
/// the picker for the rest.
async fn handle_expand(ctx: &Context, cmd: &CommandInteraction) {
    let app = {
        let data = ctx.data.read().await;
        match data.get::<App>() {
            Some(app) => app.clone(),
            None => {
                error!("App state not found in context data");
                return;
            }
        }
    };

    if cmd.guild_id.map(|g| g.get()) != Some(app.home_guild_id) {
        refuse(ctx, cmd).await;
        return;
    }
    let roles: Vec<u64> = cmd
        .member
        .as_ref()
        .map(|m| m.roles.iter().map(|r| r.get()).collect())
        .unwrap_or_default();
    if !app.operators.is_operator(cmd.user.id.get(), &roles) {
        refuse(ctx, cmd).await;
        return;
    }

    let Some(ResolvedTarget::Message(message)) = cmd.data.target() else {
        warn!("Expand command without a message target");
        return;
    };
    let content = message.content.clone();

    // Acknowledge before any network round-trip.
    if let Err(e) = cmd.defer_ephemeral(&ctx.http).await {
        error!("Failed to defer expand command: {}", e);
        return;
    }

    let matches: Vec<&str> = find_links(&content).collect();
    if matches.is_empty() {
        send_followup(
            ctx,
            cmd,
            CreateInteractionResponseFollowup::new()
                .content(NO_LINKS_NOTICE)
                .ephemeral(true),
        )
        .await;
        return;
    }

    let store = SerenityStore::new(ctx.cache.clone(), ctx.http.clone());

    // matches[0] came from the link regex, so it always parses.
    let outcome = match MessageReference::parse_link(matches[0]) {
        Some(reference) => resolve(&store, &reference).await,
        None => Resolution::Unavailable,
    };
    let mut payload = render(&outcome);

    let picker = build_picker(&store, &matches).await;
    if !picker.disabled {
        payload.description.push_str(MORE_LINKS_NOTE);
    }

    let mut rows = vec![picker_row(&picker)];
    if !payload.controls.is_empty() {
        rows.push(buttons_row(&payload.controls));
    }

    send_followup(
        ctx,
        cmd,
        CreateInteractionResponseFollowup::new()
            .embed(preview_embed(&payload))
            .components(rows)
            .ephemeral(true),
    )
    .await;
}

/// A picker selection: re-resolve the chosen reference and deliver the
/// preview as a new response, leaving the picker in place.
async fn handle_pick(ctx: &Context, comp: &ComponentInteraction, values: &[String]) {
    if let Err(e) = comp.defer_ephemeral(&ctx.http).await {
        error!("Failed to defer picker selection: {}", e);
        return;
    }

    let Some(reference) = values.first().and_then(|v| decode_value(v)) else {
        // The inert placeholder option lands here. The interaction is
        // already deferred, so a silent return would leave it spinning.
        warn!("Picker selection with undecodable value");
        let notice = CreateInteractionResponseFollowup::new()
            .content(NOTHING_SELECTED_NOTICE)
            .ephemeral(true);
        if let Err(e) = comp.create_followup(&ctx.http, notice).await {
            error!("Failed to send picker notice: {}", e);
        }
        return;
    };

    let store = SerenityStore::new(ctx.cache.clone(), ctx.http.clone());
    let payload = render(&resolve(&store, &reference).await);

    let mut followup = CreateInteractionResponseFollowup::new()
        .embed(preview_embed(&payload))
        .ephemeral(true);
    if !payload.controls.is_empty() {
        followup = followup.components(vec![buttons_row(&payload.controls)]);
    }

    if let Err(e) = comp.create_followup(&ctx.http, followup).await {
        error!("Failed to send picker followup: {}", e);
    }
}

/// A button press: decode, re-resolve, and send the drill-down payload.
/// The message may have become unavailable since the button was built, in
/// which case the unavailable preview is sent instead.
async fn handle_control(
    ctx: &Context,
    comp: &ComponentInteraction,
    kind: ControlKind,
    reference: MessageReference,
) {
    if let Err(e) = comp.defer_ephemeral(&ctx.http).await {
        error!("Failed to defer button press: {}", e);
        return;
    }

    let store = SerenityStore::new(ctx.cache.clone(), ctx.http.clone());
    let followup = match resolve(&store, &reference).await {
        Resolution::Found(resolved) => {
            let embeds = action_for(kind)
                .respond(&resolved.message)
                .iter()
                .map(embed_builder)
                .collect();
            CreateInteractionResponseFollowup::new()
                .embeds(embeds)
                .ephemeral(true)
        }
        Resolution::Unavailable => CreateInteractionResponseFollowup::new()
            .embed(preview_embed(&render(&Resolution::Unavailable)))
            .ephemeral(true),
    };

    if let Err(e) = comp.create_followup(&ctx.http, followup).await {
        error!("Failed to send button followup: {}", e);
    }
}

fn picker_row(picker: &Picker) -> CreateActionRow {
    let options = picker
        .options
        .iter()
        .map(|o| CreateSelectMenuOption::new(&o.label, &o.value))
        .collect();
    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(PICKER_CUSTOM_ID, CreateSelectMenuKind::String { options })
            .placeholder(picker.placeholder)
            .disabled(picker.disabled),
    )
}

fn buttons_row(controls: &[ControlSpec]) -> CreateActionRow {
    let buttons = controls
        .iter()
        .map(|control| {
            CreateButton::new(&control.custom_id)
                .emoji(control.kind.emoji())
                .style(ButtonStyle::Secondary)
        })
        .collect();
    CreateActionRow::Buttons(buttons)
}

async fn refuse(ctx: &Context, cmd: &CommandInteraction) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(NOT_PERMITTED_NOTICE)
            .ephemeral(true),
    );
    if let Err(e) = cmd.create_response(&ctx.http, response).await {
        error!("Failed to refuse expand command: {}", e);
    }
}

async fn send_followup(
    ctx: &Context,
    cmd: &CommandInteraction,
    followup: CreateInteractionResponseFollowup,
) {
    if let Err(e) = cmd.create_followup(&ctx.http, followup).await {
        error!("Failed to send expand followup: {}", e);
    }
}
