//! Schedule Discord commands - event CRUD and settings for the schedule
//! list embed and announcements.
//!
//! Every structural change (add, remove, date/time edit, completed-status
//! removal) reindexes the guild's display ids before the schedule embed is
//! re-rendered, so the ids users see always run 1..N in date order.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::{TeamChoice, team_or_default}, embeds},
        core::{logs::LogAction, reindex, schedule},
        entities::{EventStatus, Team},
        errors::{Error, Result},
    };
    use poise::ChoiceParameter;
    use poise::serenity_prelude as serenity;
    use serenity::CreateMessage;

    /// Which channel a `/schedule channel` invocation configures.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ScheduleChannelKind {
        #[name = "Schedule"]
        Schedule,
        #[name = "Announcements"]
        Announcements,
    }

    /// Which part of an event `/schedule edit` changes.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum EventFieldChoice {
        #[name = "Name"]
        Name,
        #[name = "Date"]
        Date,
        #[name = "Time"]
        Time,
    }

    /// Status values for `/schedule setstatus`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusChoice {
        #[name = "Active"]
        Active,
        #[name = "Completed"]
        Completed,
        #[name = "Cancelled"]
        Cancelled,
    }

    impl From<StatusChoice> for EventStatus {
        fn from(choice: StatusChoice) -> Self {
            match choice {
                StatusChoice::Active => EventStatus::Active,
                StatusChoice::Completed => EventStatus::Completed,
                StatusChoice::Cancelled => EventStatus::Cancelled,
            }
        }
    }

    /// Reindexes a guild/team's display ids (serialized per guild) and
    /// re-renders the schedule embed. Returns whether an embed was edited.
    async fn reindex_and_refresh(
        ctx: poise::Context<'_, BotData, Error>,
        guild: &str,
        team: Team,
    ) -> Result<bool> {
        let data = ctx.data();
        {
            let _guard = data.reindex_locks.acquire(guild).await;
            reindex::reindex_events(&data.database, guild, team).await?;
        }
        embeds::refresh_schedule_embed(&ctx.serenity_context().http, &data.database, guild, team)
            .await
    }

    const NO_EMBED_HINT: &str =
        "⚠ No schedule embed is set yet. Set it up using `/schedule channel`.";

    /// Team schedule management.
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("channel", "role", "emojis", "title", "add", "remove", "edit", "setstatus")
    )]
    pub async fn schedule(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Sets the schedule or announcements channel.
    ///
    /// Setting the schedule channel also posts the list embed that later
    /// edits keep current.
    #[poise::command(slash_command)]
    pub async fn channel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Which channel to configure"] kind: ScheduleChannelKind,
        #[description = "The channel to be set"] channel: serenity::GuildChannel,
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

        let kind_name = match kind {
            ScheduleChannelKind::Schedule => {
                let settings =
                    schedule::set_schedule_channel(db, &guild, team, &channel.id.to_string())
                        .await?;

                // Post the list embed now and remember it for in-place edits
                let title = settings
                    .embed_title
                    .clone()
                    .unwrap_or_else(|| schedule::DEFAULT_SCHEDULE_TITLE.to_string());
                let events = schedule::list_events(db, &guild, team).await?;
                let embed =
                    embeds::schedule_list_embed(&title, &schedule::render_event_list(&events));
                let message = channel
                    .id
                    .send_message(http, CreateMessage::new().embed(embed))
                    .await?;
                schedule::set_schedule_message(db, &guild, team, Some(&message.id.to_string()))
                    .await?;
                "schedule"
            }
            ScheduleChannelKind::Announcements => {
                schedule::set_announcements_channel(db, &guild, team, &channel.id.to_string())
                    .await?;
                "announcements"
            }
        };

        ctx.say(format!(
            "✅ Successfully updated the {kind_name} channel to <#{}>.",
            channel.id
        ))
        .await?;

        embeds::send_log_embed(
            http,
            db,
            &guild,
            &format!(
                "**Schedule settings update**\n\nThe {kind_name} channel has been updated.\n\n**Channel:** <#{}>\n**Team:** {team}\n**By:** <@{}>",
                channel.id,
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Sets the role mentioned in event announcements.
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
        schedule::set_role(db, &guild, team, &role.id.to_string()).await?;

        ctx.say(format!(
            "✅ Successfully updated the schedule announcements mention role to {role}."
        ))
        .await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Schedule settings update**\n\nThe mention role for schedule announcements has been changed.\n\n**New Role:** {role}\n**Team:** {team}\n**By:** <@{}>",
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Sets the confirmation and/or decline emoji used on announcements.
    #[poise::command(slash_command)]
    pub async fn emojis(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The emoji to use for confirmation"] confirmation: Option<String>,
        #[description = "The emoji to use for decline"] decline: Option<String>,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let confirmation = confirmation.as_deref().map(str::trim).filter(|e| !e.is_empty());
        let decline = decline.as_deref().map(str::trim).filter(|e| !e.is_empty());
        if confirmation.is_none() && decline.is_none() {
            ctx.say("❌ No emojis specified. Provide a confirmation and/or decline emoji.")
                .await?;
            return Ok(());
        }

        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        let settings = schedule::set_emojis(db, &guild, team, confirmation, decline).await?;

        ctx.say(format!(
            "✅ Successfully updated the schedule emojis. Confirmation: {}, Decline: {}.",
            settings.confirmation_emoji.as_deref().unwrap_or("unset"),
            settings.decline_emoji.as_deref().unwrap_or("unset"),
        ))
        .await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Schedule settings updated**\n\nReaction emojis for schedule announcements have been updated.\n\n**Confirmation Emoji:** {}\n**Decline Emoji:** {}\n**By:** <@{}>",
                settings.confirmation_emoji.as_deref().unwrap_or("unset"),
                settings.decline_emoji.as_deref().unwrap_or("unset"),
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Changes the title of the schedule embed.
    #[poise::command(slash_command)]
    pub async fn title(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "New value to replace the title of the current schedule"] title: String,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        if title.trim().is_empty() {
            ctx.say("❌ The title for the schedule cannot be empty.").await?;
            return Ok(());
        }
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        schedule::set_title(db, &guild, team, title.trim()).await?;
        embeds::refresh_schedule_embed(&ctx.serenity_context().http, db, &guild, team).await?;

        ctx.say(format!(
            "✅ Successfully updated the schedule title to **{}**.",
            title.trim()
        ))
        .await?;

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Schedule Title Updated**\n\nThe title of the schedule has been updated.\n\n**New Title:** {}\n**Team:** {team}\n**By:** <@{}>",
                title.trim(),
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Adds an event to the schedule.
    #[poise::command(slash_command)]
    pub async fn add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The name of the event"] event_name: String,
        #[description = "Event date (DD/MM/YY)"] event_date: String,
        #[description = "Event time (HH:MM)"] event_time: String,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        if event_name.trim().is_empty() {
            ctx.say("❌ You need to enter an event name.").await?;
            return Ok(());
        }
        let date = match schedule::parse_event_date(&event_date) {
            Ok(date) => date,
            Err(_) => {
                ctx.say("❌ Invalid date format. Use DD/MM/YY (Example: 01/01/25)")
                    .await?;
                return Ok(());
            }
        };
        let time = match schedule::parse_event_time(&event_time) {
            Ok(time) => time,
            Err(_) => {
                ctx.say("❌ Invalid time format. Use HH:MM (Example: 20:00)").await?;
                return Ok(());
            }
        };

        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer().await?;

        let event = schedule::add_event(
            db,
            &guild,
            team,
            event_name.trim(),
            date,
            time,
            &ctx.author().id.to_string(),
        )
        .await?;

        let refreshed = reindex_and_refresh(ctx, &guild, team).await?;

        ctx.say(format!(
            "✅ Event **{}** added for **{event_date} at {event_time}**. Schedule updated.",
            event.event_name
        ))
        .await?;
        if !refreshed {
            ctx.say(NO_EMBED_HINT).await?;
        }

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Schedule Event Added**\n\nAn event has been added to the schedule.\n\n**Event Name:** {}\n**Date:** {event_date}\n**Time:** {event_time}\n**Team:** {team}\n**Added By:** <@{}>",
                event.event_name,
                ctx.author().id
            ),
            LogAction::Add,
        )
        .await;
        Ok(())
    }

    /// Removes an event from the schedule by its display id.
    #[poise::command(slash_command)]
    pub async fn remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The ID shown on the left side of the event in the schedule"] id: i32,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer().await?;

        let event = match schedule::remove_event(db, &guild, team, id).await {
            Ok(event) => event,
            Err(Error::EventNotFound { .. }) => {
                ctx.say(format!("❌ No event found with the ID **{id}**.")).await?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let refreshed = reindex_and_refresh(ctx, &guild, team).await?;

        ctx.say(format!(
            "✅ Event **{}** has been removed. Schedule updated!",
            event.event_name
        ))
        .await?;
        if !refreshed {
            ctx.say(NO_EMBED_HINT).await?;
        }

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Schedule Event Removed**\n\nAn event has been removed from the schedule.\n\n**Event ID:** {id}\n**Event:** {}\n**Team:** {team}\n**Removed By:** <@{}>",
                event.event_name,
                ctx.author().id
            ),
            LogAction::Remove,
        )
        .await;
        Ok(())
    }

    /// Edits an event's name, date or time.
    #[poise::command(slash_command)]
    pub async fn edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of the event you want to edit"] id: i32,
        #[description = "Which part of the event to change"] field: EventFieldChoice,
        #[description = "New value"] value: String,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let change = match field {
            EventFieldChoice::Name => {
                if value.trim().is_empty() {
                    ctx.say("❌ The event name cannot be empty.").await?;
                    return Ok(());
                }
                schedule::EventChange::Name(value.trim().to_string())
            }
            EventFieldChoice::Date => match schedule::parse_event_date(&value) {
                Ok(date) => schedule::EventChange::Date(date),
                Err(_) => {
                    ctx.say("❌ Invalid date format. Use DD/MM/YY (Example: 01/01/25)")
                        .await?;
                    return Ok(());
                }
            },
            EventFieldChoice::Time => match schedule::parse_event_time(&value) {
                Ok(time) => schedule::EventChange::Time(time),
                Err(_) => {
                    ctx.say("❌ Invalid time format. Use HH:MM (Example: 20:00)").await?;
                    return Ok(());
                }
            },
        };

        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer().await?;

        let reorders = change.reorders();
        let event = match schedule::edit_event(db, &guild, team, id, change).await {
            Ok(event) => event,
            Err(Error::EventNotFound { .. }) => {
                ctx.say(format!("❌ No event found with the ID **{id}**.")).await?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let refreshed = if reorders {
            reindex_and_refresh(ctx, &guild, team).await?
        } else {
            embeds::refresh_schedule_embed(&ctx.serenity_context().http, db, &guild, team).await?
        };

        ctx.say(format!(
            "✅ Event **{}** updated: **{}** changed to **{}**!",
            event.event_name,
            field.name(),
            value.trim()
        ))
        .await?;
        if !refreshed {
            ctx.say(NO_EMBED_HINT).await?;
        }

        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Schedule Event Edited**\n\nAn event has been edited in the schedule.\n\n**Event ID:** {id}\n**Event:** {}\n**Updated Field:** {}\n**New Value:** {}\n**Team:** {team}\n**Edited By:** <@{}>",
                event.event_name,
                field.name(),
                value.trim(),
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Changes the status of an existing event.
    ///
    /// Completed events are removed from the schedule immediately.
    #[poise::command(slash_command)]
    pub async fn setstatus(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The ID of the event to update"] id: i32,
        #[description = "The new status of the event"] status: StatusChoice,
        #[description = "Team this applies to (default: Mixed)"] team: Option<TeamChoice>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let team = team_or_default(team);
        let guild = guild_id.to_string();
        let db = &ctx.data().database;
        let new_status = EventStatus::from(status);

        ctx.defer().await?;

        let event = match schedule::set_status(db, &guild, team, id, new_status).await {
            Ok(event) => event,
            Err(Error::EventNotFound { .. }) => {
                ctx.say(format!(
                    "❌ No event with the ID **{id}** exists, please check the schedule for valid event IDs."
                ))
                .await?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        ctx.say(format!(
            "✅ Event **{}** is now marked as **{}**.",
            event.event_name,
            new_status.as_str()
        ))
        .await?;

        if new_status == EventStatus::Completed {
            // Completed events leave the schedule right away
            schedule::remove_event(db, &guild, team, id).await?;
            reindex_and_refresh(ctx, &guild, team).await?;

            embeds::send_log_embed(
                &ctx.serenity_context().http,
                db,
                &guild,
                &format!(
                    "**Schedule Event Completed**\n\nAn event has been marked as completed and removed from the schedule.\n\n**ID:** {id}\n**Event Name:** {}\n**Team:** {team}\n**By:** <@{}>",
                    event.event_name,
                    ctx.author().id
                ),
                LogAction::Remove,
            )
            .await;
        } else {
            embeds::refresh_schedule_embed(&ctx.serenity_context().http, db, &guild, team).await?;

            embeds::send_log_embed(
                &ctx.serenity_context().http,
                db,
                &guild,
                &format!(
                    "**Schedule Event Status Updated**\n\nThe status of an event has been updated.\n\n**ID:** {id}\n**Event Name:** {}\n**Status:** {}\n**Team:** {team}\n**By:** <@{}>",
                    event.event_name,
                    new_status.as_str(),
                    ctx.author().id
                ),
                LogAction::Edit,
            )
            .await;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
