//! Schedule business logic - event storage and settings for each guild/team.
//!
//! Events are keyed by `(guild_id, team, id)` where `id` is the dense display
//! rank maintained by [`crate::core::reindex`]. Everything here returns plain
//! models; embed rendering strings are produced by the `render_*` helpers and
//! assembled into embeds by the bot layer.

use crate::core::participants;
use crate::entities::{
    EventStatus, ScheduleEvent, ScheduleEventColumn, ScheduleEventModel, ScheduleSettings,
    ScheduleSettingsModel, Team, schedule_event, schedule_settings,
};
use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::fmt::Write;

/// Default title for the schedule list embed when none is configured.
pub const DEFAULT_SCHEDULE_TITLE: &str = "Team Schedule";

/// Field name used on announcement embeds for the confirmed player list.
pub const AVAILABLE_PLAYERS_FIELD: &str = "Available Players";

/// Help text shown in the schedule embed when a guild has no events.
pub const EMPTY_SCHEDULE_TEXT: &str =
    "No events scheduled.\n\nUse `/schedule add` to add a new event.\nUse `/schedule remove` to remove an event.\nUse `/schedule edit` to edit an event.\nUse `/schedule title` to change the title of the schedule.";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Fetches the schedule settings row for a guild/team, if any.
pub async fn get_settings(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
) -> Result<Option<ScheduleSettingsModel>> {
    ScheduleSettings::find_by_id((guild_id.to_string(), team.as_str().to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Every schedule settings row in the database, for the daily announcement
/// and cleanup jobs.
pub async fn all_settings_everywhere(
    db: &DatabaseConnection,
) -> Result<Vec<ScheduleSettingsModel>> {
    ScheduleSettings::find().all(db).await.map_err(Into::into)
}

/// Applies a mutation to a guild/team's settings row, creating the row first
/// if it does not exist yet.
async fn update_settings<F>(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    apply: F,
) -> Result<ScheduleSettingsModel>
where
    F: FnOnce(&mut schedule_settings::ActiveModel),
{
    let existing = get_settings(db, guild_id, team).await?;
    let is_update = existing.is_some();

    let mut active: schedule_settings::ActiveModel = match existing {
        Some(model) => model.into(),
        None => schedule_settings::ActiveModel {
            guild_id: Set(guild_id.to_string()),
            team: Set(team.as_str().to_string()),
            ..Default::default()
        },
    };
    apply(&mut active);

    let model = if is_update {
        active.update(db).await?
    } else {
        active.insert(db).await?
    };
    Ok(model)
}

/// Sets the channel that holds the schedule list embed.
pub async fn set_schedule_channel(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    channel_id: &str,
) -> Result<ScheduleSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.schedule_channel_id = Set(Some(channel_id.to_string()));
    })
    .await
}

/// Stores (or clears) the message id of the schedule list embed.
pub async fn set_schedule_message(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    message_id: Option<&str>,
) -> Result<ScheduleSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.schedule_message_id = Set(message_id.map(ToString::to_string));
    })
    .await
}

/// Sets the channel event announcements are posted to.
pub async fn set_announcements_channel(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    channel_id: &str,
) -> Result<ScheduleSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.announcements_channel_id = Set(Some(channel_id.to_string()));
    })
    .await
}

/// Sets the role mentioned in event announcements.
pub async fn set_role(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    role_id: &str,
) -> Result<ScheduleSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.role_id = Set(Some(role_id.to_string()));
    })
    .await
}

/// Sets the schedule embed title.
pub async fn set_title(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    title: &str,
) -> Result<ScheduleSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.embed_title = Set(Some(title.to_string()));
    })
    .await
}

/// Sets the confirmation and/or decline emoji. `None` leaves an emoji as-is,
/// so admins can update one without retyping the other.
pub async fn set_emojis(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    confirmation: Option<&str>,
    decline: Option<&str>,
) -> Result<ScheduleSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        if let Some(emoji) = confirmation {
            active.confirmation_emoji = Set(Some(emoji.to_string()));
        }
        if let Some(emoji) = decline {
            active.decline_emoji = Set(Some(emoji.to_string()));
        }
    })
    .await
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// All events for a guild/team in display order: date, then time, then id.
pub async fn list_events(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
) -> Result<Vec<ScheduleEventModel>> {
    ScheduleEvent::find()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .order_by_asc(ScheduleEventColumn::EventDate)
        .order_by_asc(ScheduleEventColumn::EventTime)
        .order_by_asc(ScheduleEventColumn::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches one event by its display id.
pub async fn get_event(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    id: i32,
) -> Result<Option<ScheduleEventModel>> {
    ScheduleEvent::find_by_id((guild_id.to_string(), team.as_str().to_string(), id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new event with a provisional id one past the current maximum.
/// Callers run the reindexer afterwards so the id settles on the event's
/// chronological rank.
pub async fn add_event(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    event_name: &str,
    event_date: NaiveDate,
    event_time: NaiveTime,
    created_by: &str,
) -> Result<ScheduleEventModel> {
    let last = ScheduleEvent::find()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .order_by_desc(ScheduleEventColumn::Id)
        .one(db)
        .await?;
    let next_id = last.map_or(1, |event| event.id + 1);

    let active = schedule_event::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        team: Set(team.as_str().to_string()),
        id: Set(next_id),
        event_name: Set(event_name.to_string()),
        event_date: Set(event_date),
        event_time: Set(event_time),
        announcement_message_id: Set(None),
        participants: Set(None),
        created_by: Set(created_by.to_string()),
        status: Set(EventStatus::Active),
    };
    Ok(active.insert(db).await?)
}

/// Deletes an event by display id, returning the removed row.
pub async fn remove_event(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    id: i32,
) -> Result<ScheduleEventModel> {
    let event = get_event(db, guild_id, team, id)
        .await?
        .ok_or(Error::EventNotFound { id })?;

    ScheduleEvent::delete_by_id((guild_id.to_string(), team.as_str().to_string(), id))
        .exec(db)
        .await?;
    Ok(event)
}

/// A single-field edit to an existing event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventChange {
    /// Rename the event
    Name(String),
    /// Move the event to a different date
    Date(NaiveDate),
    /// Move the event to a different start time
    Time(NaiveTime),
}

impl EventChange {
    /// Whether this change can alter the chronological order, requiring a
    /// reindex before the schedule embed is re-rendered.
    #[must_use]
    pub const fn reorders(&self) -> bool {
        !matches!(self, EventChange::Name(_))
    }
}

/// Applies one change to an event, returning the updated row.
pub async fn edit_event(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    id: i32,
    change: EventChange,
) -> Result<ScheduleEventModel> {
    let event = get_event(db, guild_id, team, id)
        .await?
        .ok_or(Error::EventNotFound { id })?;

    let mut active: schedule_event::ActiveModel = event.into();
    match change {
        EventChange::Name(name) => active.event_name = Set(name),
        EventChange::Date(date) => active.event_date = Set(date),
        EventChange::Time(time) => active.event_time = Set(time),
    }
    Ok(active.update(db).await?)
}

/// Updates an event's lifecycle status, returning the updated row.
pub async fn set_status(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    id: i32,
    status: EventStatus,
) -> Result<ScheduleEventModel> {
    let event = get_event(db, guild_id, team, id)
        .await?
        .ok_or(Error::EventNotFound { id })?;

    let mut active: schedule_event::ActiveModel = event.into();
    active.status = Set(status);
    Ok(active.update(db).await?)
}

/// Resolves an announcement message id back to its event, if the message is
/// one of this guild's announcements. Message ids are globally unique, so the
/// team does not need to be known up front.
pub async fn find_by_announcement(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: &str,
) -> Result<Option<ScheduleEventModel>> {
    ScheduleEvent::find()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::AnnouncementMessageId.eq(message_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records the announcement message posted for an event.
pub async fn mark_announced(
    db: &DatabaseConnection,
    event: ScheduleEventModel,
    message_id: &str,
) -> Result<ScheduleEventModel> {
    let mut active: schedule_event::ActiveModel = event.into();
    active.announcement_message_id = Set(Some(message_id.to_string()));
    Ok(active.update(db).await?)
}

/// Persists an event's confirmed-player list in canonical form (empty set
/// stored as NULL).
pub async fn store_participants(
    db: &DatabaseConnection,
    event: ScheduleEventModel,
    ids: &[String],
) -> Result<ScheduleEventModel> {
    let mut active: schedule_event::ActiveModel = event.into();
    active.participants = Set(participants::serialize(ids));
    Ok(active.update(db).await?)
}

/// Active events happening on `today` that have not been announced yet.
pub async fn today_unannounced(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    today: NaiveDate,
) -> Result<Vec<ScheduleEventModel>> {
    ScheduleEvent::find()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .filter(ScheduleEventColumn::EventDate.eq(today))
        .filter(ScheduleEventColumn::AnnouncementMessageId.is_null())
        .filter(ScheduleEventColumn::Status.eq(EventStatus::Active))
        .order_by_asc(ScheduleEventColumn::EventTime)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Events marked completed, awaiting cleanup.
pub async fn completed_events(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
) -> Result<Vec<ScheduleEventModel>> {
    ScheduleEvent::find()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .filter(ScheduleEventColumn::Status.eq(EventStatus::Completed))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes all completed events for a guild/team, returning how many rows
/// went away. Callers reindex afterwards.
pub async fn delete_completed(db: &DatabaseConnection, guild_id: &str, team: Team) -> Result<u64> {
    let result = ScheduleEvent::delete_many()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .filter(ScheduleEventColumn::Status.eq(EventStatus::Completed))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

// ---------------------------------------------------------------------------
// Parsing and rendering
// ---------------------------------------------------------------------------

/// Parses user input in `DD/MM/YY` form. Two-digit years always mean 20YY.
pub fn parse_event_date(input: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate {
        input: input.to_string(),
    };

    let mut parts = input.split('/');
    let (day, month, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(day), Some(month), Some(year), None) => (day, month, year),
        _ => return Err(invalid()),
    };
    for part in [day, month, year] {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
    }

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or_else(invalid)
}

/// Parses user input in `HH:MM` form.
pub fn parse_event_time(input: &str) -> Result<NaiveTime> {
    let invalid = || Error::InvalidTime {
        input: input.to_string(),
    };

    let (hour, minute) = input.split_once(':').ok_or_else(invalid)?;
    for part in [hour, minute] {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
    }
    NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| invalid())
}

/// Formats an event date the way users type it: `DD/MM/YY`.
#[must_use]
pub fn format_event_date(date: NaiveDate) -> String {
    date.format("%d/%m/%y").to_string()
}

/// Formats an event time as `HH:MM`.
#[must_use]
pub fn format_event_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Renders the schedule embed description: one block per event with its
/// display id, or the empty-schedule help text.
#[must_use]
pub fn render_event_list(events: &[ScheduleEventModel]) -> String {
    if events.is_empty() {
        return EMPTY_SCHEDULE_TEXT.to_string();
    }

    let mut list = String::new();
    for event in events {
        // write! to a String cannot fail
        let _ = writeln!(
            &mut list,
            "**[{}]**\n**Event:** {}\n**Date:** {}\n**Time:** {}\n",
            event.id,
            event.event_name,
            format_event_date(event.event_date),
            format_event_time(event.event_time),
        );
    }
    list.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_event, setup_test_db};

    #[tokio::test]
    async fn test_add_and_list_orders_chronologically() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_event(&db, "g1", Team::Mixed, "Later", "02/03/25", "20:00").await?;
        create_test_event(&db, "g1", Team::Mixed, "Earlier", "01/03/25", "21:00").await?;
        create_test_event(&db, "g1", Team::Mixed, "Same day", "02/03/25", "18:00").await?;

        let events = list_events(&db, "g1", Team::Mixed).await?;
        let names: Vec<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
        assert_eq!(names, ["Earlier", "Same day", "Later"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_events_are_scoped_per_guild_and_team() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_event(&db, "g1", Team::Mixed, "Mixed event", "01/03/25", "20:00").await?;
        create_test_event(&db, "g1", Team::Female, "Female event", "01/03/25", "20:00").await?;
        create_test_event(&db, "g2", Team::Mixed, "Other guild", "01/03/25", "20:00").await?;

        let events = list_events(&db, "g1", Team::Mixed).await?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, "Mixed event");

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_unknown_event_errors() -> Result<()> {
        let db = setup_test_db().await?;

        let result = remove_event(&db, "g1", Team::Mixed, 7).await;
        assert!(matches!(result, Err(Error::EventNotFound { id: 7 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_event_changes_single_field() -> Result<()> {
        let db = setup_test_db().await?;
        let event =
            create_test_event(&db, "g1", Team::Mixed, "Scrim night", "01/03/25", "20:00").await?;

        let renamed = edit_event(
            &db,
            "g1",
            Team::Mixed,
            event.id,
            EventChange::Name("Finals".to_string()),
        )
        .await?;
        assert_eq!(renamed.event_name, "Finals");
        assert_eq!(renamed.event_date, event.event_date);

        assert!(!EventChange::Name(String::new()).reorders());
        assert!(EventChange::Date(renamed.event_date).reorders());
        assert!(EventChange::Time(renamed.event_time).reorders());

        Ok(())
    }

    #[tokio::test]
    async fn test_store_participants_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let event =
            create_test_event(&db, "g1", Team::Mixed, "Scrim night", "01/03/25", "20:00").await?;

        let ids = vec!["111".to_string(), "222".to_string()];
        let updated = store_participants(&db, event, &ids).await?;
        assert_eq!(updated.participants.as_deref(), Some("111,222"));

        let cleared = store_participants(&db, updated, &[]).await?;
        assert_eq!(cleared.participants, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_announcement() -> Result<()> {
        let db = setup_test_db().await?;
        let event =
            create_test_event(&db, "g1", Team::Clan, "Clan war", "01/03/25", "20:00").await?;

        assert!(find_by_announcement(&db, "g1", "msg-1").await?.is_none());

        let announced = mark_announced(&db, event, "msg-1").await?;
        let found = find_by_announcement(&db, "g1", "msg-1")
            .await?
            .expect("announced event is resolvable");
        assert_eq!(found.id, announced.id);
        assert_eq!(found.event_name, "Clan war");

        Ok(())
    }

    #[test]
    fn test_parse_event_date() {
        let date = parse_event_date("05/01/25").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());

        assert!(parse_event_date("5/1/25").is_err());
        assert!(parse_event_date("2025-01-05").is_err());
        assert!(parse_event_date("31/02/25").is_err());
        assert!(parse_event_date("aa/bb/cc").is_err());
    }

    #[test]
    fn test_parse_event_time() {
        let time = parse_event_time("20:30").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(20, 30, 0).unwrap());

        assert!(parse_event_time("8:30").is_err());
        assert!(parse_event_time("25:00").is_err());
        assert!(parse_event_time("20.30").is_err());
    }

    #[tokio::test]
    async fn test_render_event_list() -> Result<()> {
        let db = setup_test_db().await?;

        assert_eq!(render_event_list(&[]), EMPTY_SCHEDULE_TEXT);

        create_test_event(&db, "g1", Team::Mixed, "Scrim night", "05/01/25", "20:00").await?;
        let events = list_events(&db, "g1", Team::Mixed).await?;
        let rendered = render_event_list(&events);
        assert!(rendered.contains("**[1]**"));
        assert!(rendered.contains("**Event:** Scrim night"));
        assert!(rendered.contains("**Date:** 05/01/25"));
        assert!(rendered.contains("**Time:** 20:00"));

        Ok(())
    }
}
