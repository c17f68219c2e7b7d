//! Schedule event entity - one row per upcoming event on a guild's schedule.
//!
//! The `id` column is a display rank, not an insertion id: within a
//! `(guild_id, team)` collection active events are always numbered `1..N` in
//! chronological order, and the reindexer reassigns the numbering after every
//! structural change. Users pass these small ids to `/schedule remove` and
//! `/schedule edit`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_events")]
pub struct Model {
    /// Discord guild the event belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Team roster the event belongs to (see [`super::Team`])
    #[sea_orm(primary_key, auto_increment = false)]
    pub team: String,
    /// Dense display id, 1..N in (date, time) order within the guild/team
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Human-readable event name shown in the schedule embed
    pub event_name: String,
    /// Event date
    pub event_date: Date,
    /// Event start time
    pub event_time: Time,
    /// Message id of the announcement embed, once one has been posted
    pub announcement_message_id: Option<String>,
    /// Comma-joined Discord user ids of confirmed players; None when empty
    pub participants: Option<String>,
    /// Discord user id of whoever added the event
    pub created_by: String,
    /// Lifecycle status of the event
    pub status: EventStatus,
}

/// Lifecycle status of a schedule event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EventStatus {
    /// The event is upcoming
    #[sea_orm(string_value = "active")]
    Active,
    /// The event has taken place; the cleanup job removes completed rows
    #[sea_orm(string_value = "completed")]
    Completed,
    /// The event was called off but stays visible on the schedule
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl EventStatus {
    /// The status name as shown to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
