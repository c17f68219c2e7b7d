//! Schedule settings entity - per guild and team configuration for the
//! schedule list embed and event announcements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_settings")]
pub struct Model {
    /// Discord guild these settings belong to
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Team roster these settings belong to
    #[sea_orm(primary_key, auto_increment = false)]
    pub team: String,
    /// Channel holding the pinned schedule list embed
    pub schedule_channel_id: Option<String>,
    /// Message id of the schedule list embed, edited in place on changes
    pub schedule_message_id: Option<String>,
    /// Channel event announcements are posted to
    pub announcements_channel_id: Option<String>,
    /// Role mentioned in event announcements
    pub role_id: Option<String>,
    /// Embed title override; defaults to "Team Schedule" when unset
    pub embed_title: Option<String>,
    /// Emoji that marks a player as available on an announcement
    pub confirmation_emoji: Option<String>,
    /// Emoji that withdraws a player's availability
    pub decline_emoji: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
