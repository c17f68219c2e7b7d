//! Scrim Discord commands - settings, posting and repair of the daily
//! availability embed.
//!
//! These are thin wrappers: validation and replies here, storage in
//! `core::scrim`, posting/repair flows shared with the daily jobs in
//! `bot::embeds`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::{TeamChoice, team_or_default}, embeds, handlers::reactions::reaction_key},
        core::{logs::LogAction, scrim, tally},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use serenity::EditMessage;
    use tracing::warn;

    /// Scrim availability management.
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("channel", "role", "title", "emojis", "send", "fix")
    )]
    pub async fn scrim(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Sets the channel the scrim availability embed is posted to.
    #[poise::command(slash_command)]
    pub async fn channel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel to post availability embeds in"]
        channel: serenity::GuildChannel,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        scrim::set_channel(db, &guild, team, &channel.id.to_string()).await?;

        ctx.say(format!(
            "✅ Scrim channel for **{team}** set to <#{}>.",
            channel.id
        ))
        .await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Scrim settings update**\n\nThe scrim channel has been updated.\n\n**Channel:** <#{}>\n**Team:** {team}\n**By:** <@{}>",
                channel.id,
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Sets the role mentioned when a new availability embed is posted.
    #[poise::command(slash_command)]
    pub async fn role(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The role to mention"] role: serenity::Role,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        scrim::set_role(db, &guild, team, &role.id.to_string()).await?;

        ctx.say(format!("✅ Scrim mention role for **{team}** set to {role}.")).await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Scrim settings update**\n\nThe mention role for scrim embeds has been changed.\n\n**New Role:** {role}\n**Team:** {team}\n**By:** <@{}>",
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Sets the title of the scrim availability embed.
    #[poise::command(slash_command)]
    pub async fn title(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "New embed title"] title: String,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        if title.trim().is_empty() {
            ctx.say("❌ The title cannot be empty.").await?;
            return Ok(());
        }
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        scrim::set_title(db, &guild, team, title.trim()).await?;

        ctx.say(format!(
            "✅ Scrim embed title for **{team}** set to **{}**.",
            title.trim()
        ))
        .await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Scrim settings update**\n\nThe scrim embed title has been changed.\n\n**New Title:** {}\n**Team:** {team}\n**By:** <@{}>",
                title.trim(),
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Sets the three headcount reaction emojis for this guild.
    ///
    /// Custom emojis are passed in mention form (`<:name:id>`); plain unicode
    /// emojis work as-is. All three must be configured before the tally
    /// engine reacts to anything.
    #[poise::command(slash_command)]
    pub async fn emojis(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Emoji for the 16 players bracket"] emoji_16: String,
        #[description = "Emoji for the 20 players bracket"] emoji_20: String,
        #[description = "Emoji for the 23 players bracket"] emoji_23: String,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let entries = [emoji_16.trim(), emoji_20.trim(), emoji_23.trim()];
        if entries.iter().any(|emoji| emoji.is_empty()) {
            ctx.say("❌ All three emojis must be provided.").await?;
            return Ok(());
        }

        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        scrim::set_emojis(db, &guild, entries[0], entries[1], entries[2]).await?;

        ctx.say(format!(
            "✅ Scrim emojis updated: {} {} {}.",
            entries[0], entries[1], entries[2]
        ))
        .await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Scrim settings update**\n\nThe headcount reaction emojis have been updated.\n\n**16 Players:** {}\n**20 Players:** {}\n**23 Players:** {}\n**By:** <@{}>",
                entries[0],
                entries[1],
                entries[2],
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Posts a fresh availability embed now.
    ///
    /// The daily job posts one automatically every morning; this is the
    /// manual version for mid-day reposts.
    #[poise::command(slash_command)]
    pub async fn send(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;

        let posted =
            embeds::post_availability_embed(&ctx.serenity_context().http, db, &guild, team)
                .await?;
        if posted {
            ctx.say(format!("✅ Scrim availability embed posted for **{team}**."))
                .await?;
        } else {
            ctx.say(
                "❌ Could not post: set up the scrim channel with `/scrim channel` and the emojis with `/scrim emojis` first.",
            )
            .await?;
        }
        Ok(())
    }

    /// Rebuilds the availability embed from the live reaction lists.
    ///
    /// Re-derives every slot's member list from who is actually reacting
    /// right now (bots filtered out) and re-adds any missing bot reactions.
    /// This is the repair path when the embed has gone stale.
    #[poise::command(slash_command)]
    pub async fn fix(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;
        let http = &ctx.serenity_context().http;

        ctx.defer_ephemeral().await?;

        let Some(settings) = scrim::get_settings(db, &guild, team).await? else {
            ctx.say("❌ No scrim settings found. Use `/scrim channel` first.")
                .await?;
            return Ok(());
        };
        let Some(channel_id) = settings.channel_id.as_deref().and_then(embeds::parse_channel)
        else {
            ctx.say("❌ Scrim channel is not set. Use `/scrim channel` first.")
                .await?;
            return Ok(());
        };
        let Some(message_id) = settings.message_id.as_deref().and_then(embeds::parse_message)
        else {
            ctx.say("❌ No scrim message found. Use `/scrim send` first.")
                .await?;
            return Ok(());
        };
        let Some(slots) = scrim::get_emojis(db, &guild)
            .await?
            .as_ref()
            .and_then(tally::slots_from_config)
        else {
            ctx.say("❌ Scrim emojis are not set. Use `/scrim emojis` first.")
                .await?;
            return Ok(());
        };

        // Serialize against the live tally handler for the same message
        let _guard = ctx.data().tally_locks.acquire(&message_id.to_string()).await;

        let message = match http.get_message(channel_id, message_id).await {
            Ok(message) => message,
            Err(err) => {
                warn!("Failed to fetch scrim message {message_id} for guild {guild}: {err}");
                ctx.say("❌ Scrim message not found. You may need to resend it with `/scrim send`.")
                    .await?;
                return Ok(());
            }
        };

        // Re-add any reactions that were cleared
        for slot in &slots {
            let present = message
                .reactions
                .iter()
                .any(|reaction| reaction_key(&reaction.reaction_type) == slot.key);
            if present {
                continue;
            }
            let Some(reaction) = embeds::parse_reaction(&slot.raw) else {
                continue;
            };
            if let Err(err) = http.create_reaction(channel_id, message_id, &reaction).await {
                warn!("Failed to re-add reaction {} to scrim embed: {err}", slot.raw);
            }
        }

        // Rebuild every slot from the canonical reaction user lists
        let mut fields = Vec::with_capacity(slots.len());
        for slot in &slots {
            let members = match embeds::parse_reaction(&slot.raw) {
                Some(reaction) => {
                    match http
                        .get_reaction_users(channel_id, message_id, &reaction, 100, None)
                        .await
                    {
                        Ok(users) => users
                            .iter()
                            .filter(|user| !user.bot)
                            .map(|user| user.display_name().to_string())
                            .collect(),
                        Err(err) => {
                            warn!("Failed to fetch users for {}: {err}", slot.raw);
                            Vec::new()
                        }
                    }
                }
                None => Vec::new(),
            };
            fields.push((slot.field_name(), tally::render_members(&members)));
        }

        let embed_title = settings
            .embed_title
            .clone()
            .unwrap_or_else(|| scrim::DEFAULT_SCRIM_TITLE.to_string());
        let edit = EditMessage::new().embed(embeds::availability_embed(&embed_title, fields));
        http.edit_message(channel_id, message_id, &edit, vec![])
            .await?;

        ctx.say("✅ Scrim availability updated successfully!").await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
