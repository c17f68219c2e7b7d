//! Embed construction and the shared posting/refresh workflows.
//!
//! Commands, reaction handlers and the daily jobs all render the same three
//! embeds (scrim availability, schedule list, event announcement) plus the
//! action-log embed, so the builders and the post/refresh flows live here.

use crate::core::{
    logs::{self, DEFAULT_LOG_TITLE, LogAction},
    schedule, scrim, tally,
};
use crate::entities::{ScheduleEventModel, ScheduleSettingsModel, Team};
use crate::errors::Result;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use serenity::{
    ChannelId, CreateEmbed, CreateMessage, EditMessage, Http, MessageId, ReactionType, Timestamp,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Accent colour shared by the scrim availability and schedule list embeds.
const EMBED_BLUE: u32 = 0x0000_AAFF;

/// Accent colour for event announcement embeds.
const ANNOUNCEMENT_BLUE: u32 = 0x0000_7FFF;

/// Parses a stored snowflake column into a [`ChannelId`].
pub(crate) fn parse_channel(stored: &str) -> Option<ChannelId> {
    stored.parse::<u64>().ok().filter(|id| *id != 0).map(ChannelId::new)
}

/// Parses a stored snowflake column into a [`MessageId`].
pub(crate) fn parse_message(stored: &str) -> Option<MessageId> {
    stored.parse::<u64>().ok().filter(|id| *id != 0).map(MessageId::new)
}

/// Parses a stored emoji string into a reactable [`ReactionType`].
pub(crate) fn parse_reaction(stored: &str) -> Option<ReactionType> {
    ReactionType::try_from(stored)
        .inspect_err(|err| warn!("Stored emoji '{stored}' is not reactable: {err}"))
        .ok()
}

/// Rebuilds an embed fetched from Discord with a replacement field list,
/// preserving title, description and colour. The platform has no
/// partial-field-edit primitive, so the whole embed is re-sent in one edit.
#[must_use]
pub fn rebuild_embed(embed: &serenity::Embed, fields: Vec<(String, String, bool)>) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title.clone());
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description.clone());
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(colour);
    }
    builder.fields(fields)
}

/// Builds the scrim availability embed: one inline field per headcount slot.
#[must_use]
pub fn availability_embed(title: &str, fields: Vec<(String, String)>) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(scrim::SCRIM_EMBED_DESCRIPTION)
        .colour(EMBED_BLUE)
        .fields(fields.into_iter().map(|(name, value)| (name, value, true)))
}

/// Builds the schedule list embed from a rendered event list.
#[must_use]
pub fn schedule_list_embed(title: &str, event_list: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(event_list)
        .colour(EMBED_BLUE)
}

/// Builds the announcement embed for one of today's events.
#[must_use]
pub fn announcement_embed(event: &ScheduleEventModel) -> CreateEmbed {
    CreateEmbed::new()
        .title("Today's Schedule")
        .colour(ANNOUNCEMENT_BLUE)
        .description(format!(
            "**Event:** {}\n**Time:** {}\n\nReact if you are available for this event.",
            event.event_name,
            schedule::format_event_time(event.event_time),
        ))
        .field(schedule::AVAILABLE_PLAYERS_FIELD, tally::NO_PLAYERS, false)
}

/// Posts an action-log embed to the guild's configured log channel.
///
/// Best effort by design: a guild without log settings, or with a deleted
/// log channel, gets a debug line and nothing else. Mutating commands call
/// this after the fact and never fail because logging failed.
pub async fn send_log_embed(
    http: &Arc<Http>,
    db: &DatabaseConnection,
    guild_id: &str,
    message: &str,
    action: LogAction,
) {
    let settings = match logs::get_settings(db, guild_id).await {
        Ok(settings) => settings,
        Err(err) => {
            warn!("Failed to load log settings for guild {guild_id}: {err}");
            return;
        }
    };

    let Some(channel) = settings
        .as_ref()
        .and_then(|row| row.channel_id.as_deref())
        .and_then(parse_channel)
    else {
        debug!("Log channel not set, skipping log for guild {guild_id}");
        return;
    };

    let title = settings
        .as_ref()
        .and_then(|row| row.embed_title.clone())
        .unwrap_or_else(|| DEFAULT_LOG_TITLE.to_string());

    let embed = CreateEmbed::new()
        .title(title)
        .description(message)
        .colour(action.colour())
        .timestamp(Timestamp::now());

    if let Err(err) = channel.send_message(http, CreateMessage::new().embed(embed)).await {
        warn!("Error sending log embed for guild {guild_id}: {err}");
    }
}

/// Posts a fresh scrim availability embed for a guild/team, stores its
/// message id, seeds the bot's own reactions and mentions the configured
/// role. Returns `false` (with a log line) when the guild is not fully
/// configured; nothing is posted in that case.
pub async fn post_availability_embed(
    http: &Arc<Http>,
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
) -> Result<bool> {
    let Some(settings) = scrim::get_settings(db, guild_id, team).await? else {
        debug!("No scrim settings for guild {guild_id} ({team}), skipping post");
        return Ok(false);
    };
    let Some(channel) = settings.channel_id.as_deref().and_then(parse_channel) else {
        debug!("No scrim channel for guild {guild_id} ({team}), skipping post");
        return Ok(false);
    };

    let Some(slots) = scrim::get_emojis(db, guild_id)
        .await?
        .as_ref()
        .and_then(tally::slots_from_config)
    else {
        warn!("Emoji settings incomplete for guild {guild_id}, skipping scrim post");
        return Ok(false);
    };

    let title = settings
        .embed_title
        .clone()
        .unwrap_or_else(|| scrim::DEFAULT_SCRIM_TITLE.to_string());
    let fields = slots
        .iter()
        .map(|slot| (slot.field_name(), tally::NO_PLAYERS.to_string()))
        .collect();

    let message = channel
        .send_message(http, CreateMessage::new().embed(availability_embed(&title, fields)))
        .await?;

    scrim::set_message(db, guild_id, team, Some(&message.id.to_string())).await?;

    for slot in &slots {
        let Some(reaction) = parse_reaction(&slot.raw) else {
            continue;
        };
        if let Err(err) = http.create_reaction(channel, message.id, &reaction).await {
            warn!("Failed to seed reaction {} on scrim embed: {err}", slot.raw);
        }
    }

    if let Some(role_id) = settings.role_id.as_deref() {
        let mention = CreateMessage::new().content(format!("<@&{role_id}>"));
        if let Err(err) = channel.send_message(http, mention).await {
            warn!("Failed to mention scrim role for guild {guild_id}: {err}");
        }
    }

    info!("Posted scrim availability embed for guild {guild_id} ({team})");
    Ok(true)
}

/// Re-renders the schedule list embed for a guild/team from current rows.
/// Returns `false` when no embed has been set up or the stored message is
/// gone; displayed state is then stale until an admin reruns
/// `/schedule channel`.
pub async fn refresh_schedule_embed(
    http: &Arc<Http>,
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
) -> Result<bool> {
    let Some(settings) = schedule::get_settings(db, guild_id, team).await? else {
        return Ok(false);
    };
    let (Some(channel), Some(message)) = (
        settings.schedule_channel_id.as_deref().and_then(parse_channel),
        settings.schedule_message_id.as_deref().and_then(parse_message),
    ) else {
        return Ok(false);
    };

    let title = settings
        .embed_title
        .clone()
        .unwrap_or_else(|| schedule::DEFAULT_SCHEDULE_TITLE.to_string());
    let events = schedule::list_events(db, guild_id, team).await?;
    let edit = EditMessage::new().embed(schedule_list_embed(&title, &schedule::render_event_list(&events)));

    match http.edit_message(channel, message, &edit, vec![]).await {
        Ok(_) => Ok(true),
        Err(err) => {
            warn!("Failed to refresh schedule embed for guild {guild_id} ({team}): {err}");
            Ok(false)
        }
    }
}

/// Announces one event: posts the embed, records the announcement message id
/// on the event row, seeds the confirm/decline reactions and mentions the
/// configured role. Returns the updated row, or `None` when the settings row
/// has no announcements channel.
pub async fn announce_event(
    http: &Arc<Http>,
    db: &DatabaseConnection,
    settings: &ScheduleSettingsModel,
    event: ScheduleEventModel,
) -> Result<Option<ScheduleEventModel>> {
    let Some(channel) = settings
        .announcements_channel_id
        .as_deref()
        .and_then(parse_channel)
    else {
        debug!(
            "Announcements channel not set for guild {} ({}), skipping",
            settings.guild_id, settings.team
        );
        return Ok(None);
    };

    let mut create = CreateMessage::new().embed(announcement_embed(&event));
    if let Some(role_id) = settings.role_id.as_deref() {
        create = create.content(format!("<@&{role_id}>"));
    }
    let message = channel.send_message(http, create).await?;

    let updated = schedule::mark_announced(db, event, &message.id.to_string()).await?;

    let emojis = [
        settings.confirmation_emoji.as_deref(),
        settings.decline_emoji.as_deref(),
    ];
    if emojis.iter().any(Option::is_none) {
        warn!(
            "Skipping reactions for guild {}: no emojis configured",
            settings.guild_id
        );
        return Ok(Some(updated));
    }
    for stored in emojis.into_iter().flatten() {
        let Some(reaction) = parse_reaction(stored) else {
            continue;
        };
        if let Err(err) = http.create_reaction(channel, message.id, &reaction).await {
            warn!("Failed to seed reaction {stored} on announcement: {err}");
        }
    }

    Ok(Some(updated))
}
