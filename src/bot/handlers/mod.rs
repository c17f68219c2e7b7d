//! Gateway event handlers.
//!
//! Poise routes raw serenity events here. Reaction add/remove feed the tally
//! engine; message deletions clear stored tally-target ids so the settings
//! rows never point at messages that no longer exist.

/// Reaction tally engine - Discord side
pub mod reactions;

use crate::bot::{BotData, embeds};
use crate::core::{logs::LogAction, schedule, scrim};
use crate::entities::Team;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

/// Dispatches gateway events to their handlers.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            reactions::handle_reaction(ctx, data, add_reaction, reactions::TallyEvent::Add).await
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            reactions::handle_reaction(ctx, data, removed_reaction, reactions::TallyEvent::Remove)
                .await
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if is_new.unwrap_or(false) {
                // Settings rows are created lazily by the first command that
                // touches them, so joining needs no seeding.
                info!("Joined new guild: {} - {}", guild.id, guild.name);
            }
            Ok(())
        }
        serenity::FullEvent::MessageDelete {
            deleted_message_id,
            guild_id,
            ..
        } => {
            if let Some(guild_id) = guild_id {
                handle_message_delete(ctx, data, &guild_id.to_string(), &deleted_message_id.to_string())
                    .await
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

/// Clears stored message ids pointing at a message that was deleted
/// externally, so the tally engine stops treating it as a target and admins
/// get a log-channel hint to repost.
async fn handle_message_delete(
    ctx: &serenity::Context,
    data: &BotData,
    guild_id: &str,
    message_id: &str,
) -> Result<()> {
    let db = &data.database;

    for team in Team::ALL {
        match scrim::get_settings(db, guild_id, team).await {
            Ok(Some(settings)) if settings.message_id.as_deref() == Some(message_id) => {
                scrim::set_message(db, guild_id, team, None).await?;
                warn!("Scrim embed deleted in guild {guild_id} ({team}), cleared stored id");
                embeds::send_log_embed(
                    &ctx.http,
                    db,
                    guild_id,
                    "Scrim availability embed was deleted. Use `/scrim send` to repost it.",
                    LogAction::Warning,
                )
                .await;
                return Ok(());
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Failed to check scrim settings for guild {guild_id}: {err}");
            }
        }

        match schedule::get_settings(db, guild_id, team).await {
            Ok(Some(settings)) if settings.schedule_message_id.as_deref() == Some(message_id) => {
                schedule::set_schedule_message(db, guild_id, team, None).await?;
                warn!("Schedule embed deleted in guild {guild_id} ({team}), cleared stored id");
                embeds::send_log_embed(
                    &ctx.http,
                    db,
                    guild_id,
                    "Schedule embed was deleted. Use `/schedule channel` to set it up again.",
                    LogAction::Warning,
                )
                .await;
                return Ok(());
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Failed to check schedule settings for guild {guild_id}: {err}");
            }
        }
    }

    Ok(())
}
