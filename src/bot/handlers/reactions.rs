//! Reaction tally engine - Discord side.
//!
//! Classifies each reaction event against the guild's known tally targets
//! and keeps the target embed's membership fields in sync. All expected
//! failure modes (missing configuration, deleted messages, unknown emojis)
//! are logged and dropped; a reaction event is never retried and an embed is
//! never left partially edited.
//!
//! The fetch-embed / compute / edit sequence for a given message runs under
//! that message's entry in `BotData::tally_locks`, so two rapid reactions
//! cannot interleave and lose an update.

use crate::bot::{BotData, embeds};
use crate::config::database::with_retry;
use crate::core::{
    classify::{self, TallyTarget},
    participants, schedule, scrim, tally,
};
use crate::entities::Team;
use crate::errors::Result;
use poise::serenity_prelude as serenity;
use serenity::{EditMessage, Reaction, ReactionType, User};
use tracing::{debug, warn};

/// Which direction a reaction event moves a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyEvent {
    /// A reaction was added
    Add,
    /// A reaction was removed
    Remove,
}

/// The matching key for a live reaction: custom emoji id, or the literal
/// unicode emoji. Mirrors [`tally::emoji_key`] for stored configuration.
pub(crate) fn reaction_key(emoji: &ReactionType) -> String {
    match emoji {
        ReactionType::Custom { id, .. } => id.to_string(),
        ReactionType::Unicode(value) => value.clone(),
        other => other.to_string(),
    }
}

/// Handles one reaction add/remove gateway event.
pub async fn handle_reaction(
    ctx: &serenity::Context,
    data: &BotData,
    reaction: &Reaction,
    event: TallyEvent,
) -> Result<()> {
    let Some(guild_id) = reaction.guild_id else {
        return Ok(());
    };

    let user = match reaction.user(ctx).await {
        Ok(user) => user,
        Err(err) => {
            warn!("Failed to fetch reacting user: {err}");
            return Ok(());
        }
    };
    // The bot seeds its own reactions on every embed it posts; those must
    // never be tallied
    if user.bot {
        return Ok(());
    }

    let db = &data.database;
    let guild = guild_id.to_string();
    let message_id = reaction.message_id.to_string();

    let target = with_retry(|| classify::classify_message(db, &guild, &message_id)).await?;
    match target {
        Some(TallyTarget::Scrim { team }) => {
            scrim_tally(ctx, data, reaction, &user, &guild, team, event).await
        }
        Some(TallyTarget::Announcement(_)) => {
            announcement_tally(ctx, data, reaction, &user, &guild, event).await
        }
        None => Ok(()),
    }
}

/// Headcount tally on a scrim availability embed. Membership is derived from
/// the embed's own field text; the platform reaction list stays the source
/// of truth and `/scrim fix` re-derives the whole embed from it.
async fn scrim_tally(
    ctx: &serenity::Context,
    data: &BotData,
    reaction: &Reaction,
    user: &User,
    guild: &str,
    team: Team,
    event: TallyEvent,
) -> Result<()> {
    let db = &data.database;

    let Some(config) = with_retry(|| scrim::get_emojis(db, guild)).await? else {
        warn!("Emoji settings missing for guild {guild}");
        return Ok(());
    };
    let Some(slots) = tally::slots_from_config(&config) else {
        warn!("Emoji settings incomplete for guild {guild}, skipping {team} scrim tally");
        return Ok(());
    };

    let key = reaction_key(&reaction.emoji);
    let Some(slot) = tally::resolve_slot(&slots, &key) else {
        debug!("Reaction emoji not found in emoji settings for guild {guild}");
        return Ok(());
    };

    let name = user.display_name().to_string();

    let _guard = data.tally_locks.acquire(&reaction.message_id.to_string()).await;

    let message = match ctx
        .http
        .get_message(reaction.channel_id, reaction.message_id)
        .await
    {
        Ok(message) => message,
        Err(err) => {
            warn!("Failed to fetch scrim message {}: {err}", reaction.message_id);
            return Ok(());
        }
    };
    let Some(embed) = message.embeds.first() else {
        warn!("Scrim message {} has no embed", reaction.message_id);
        return Ok(());
    };

    let field_name = slot.field_name();
    let fields: Vec<(String, String, bool)> = embed
        .fields
        .iter()
        .map(|field| {
            let value = if field.name == field_name {
                match event {
                    TallyEvent::Add => tally::add_member(&field.value, &name),
                    TallyEvent::Remove => tally::remove_member(&field.value, &name),
                }
            } else {
                field.value.clone()
            };
            (field.name.clone(), value, field.inline)
        })
        .collect();

    let edit = EditMessage::new().embed(embeds::rebuild_embed(embed, fields));
    if let Err(err) = ctx
        .http
        .edit_message(reaction.channel_id, reaction.message_id, &edit, vec![])
        .await
    {
        warn!("Failed to edit scrim embed {}: {err}", reaction.message_id);
    }
    Ok(())
}

/// Confirmation tally on an event announcement embed. Membership is single
/// slot and persisted on the event row: the confirmation emoji adds the
/// user, the decline emoji removes them, anything else is ignored.
async fn announcement_tally(
    ctx: &serenity::Context,
    data: &BotData,
    reaction: &Reaction,
    user: &User,
    guild: &str,
    event: TallyEvent,
) -> Result<()> {
    let db = &data.database;
    let message_id = reaction.message_id.to_string();

    let _guard = data.tally_locks.acquire(&message_id).await;

    // Re-resolve under the lock: membership is always re-derived from the
    // stored row, never from a previously fetched copy
    let Some(event_row) =
        with_retry(|| schedule::find_by_announcement(db, guild, &message_id)).await?
    else {
        return Ok(());
    };
    let Some(team) = Team::from_column(&event_row.team) else {
        warn!("Event row for message {message_id} has unknown team '{}'", event_row.team);
        return Ok(());
    };
    let Some(settings) = with_retry(|| schedule::get_settings(db, guild, team)).await? else {
        warn!("Schedule settings missing for guild {guild}");
        return Ok(());
    };

    let key = reaction_key(&reaction.emoji);
    let confirm = settings.confirmation_emoji.as_deref().map(tally::emoji_key);
    let decline = settings.decline_emoji.as_deref().map(tally::emoji_key);

    let operation = if confirm == Some(key.as_str()) {
        event
    } else if decline == Some(key.as_str()) {
        match event {
            // Declining withdraws availability; un-declining changes nothing
            TallyEvent::Add => TallyEvent::Remove,
            TallyEvent::Remove => return Ok(()),
        }
    } else {
        debug!("Reaction emoji not configured for schedule announcements in guild {guild}");
        return Ok(());
    };

    let mut ids = participants::parse(event_row.participants.as_deref());
    let user_id = user.id.to_string();
    let changed = match operation {
        TallyEvent::Add => participants::add(&mut ids, &user_id),
        TallyEvent::Remove => participants::remove(&mut ids, &user_id),
    };

    if changed {
        with_retry(|| schedule::store_participants(db, event_row.clone(), &ids)).await?;
    }

    let value = participants::render_mentions(&ids);
    let message = match ctx
        .http
        .get_message(reaction.channel_id, reaction.message_id)
        .await
    {
        Ok(message) => message,
        Err(err) => {
            warn!("Failed to fetch announcement message {message_id}: {err}");
            return Ok(());
        }
    };
    let Some(embed) = message.embeds.first() else {
        warn!("Announcement message {message_id} has no embed");
        return Ok(());
    };

    let fields: Vec<(String, String, bool)> = embed
        .fields
        .iter()
        .map(|field| {
            let field_value = if field.name == schedule::AVAILABLE_PLAYERS_FIELD {
                value.clone()
            } else {
                field.value.clone()
            };
            (field.name.clone(), field_value, field.inline)
        })
        .collect();

    let edit = EditMessage::new().embed(embeds::rebuild_embed(embed, fields));
    if let Err(err) = ctx
        .http
        .edit_message(reaction.channel_id, reaction.message_id, &edit, vec![])
        .await
    {
        warn!("Failed to edit announcement embed {message_id}: {err}");
    }
    Ok(())
}
