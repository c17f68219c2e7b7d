//! Scrim settings entity - per guild and team configuration for the daily
//! scrim availability embed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Scrim settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scrim_settings")]
pub struct Model {
    /// Discord guild these settings belong to
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Team roster these settings belong to
    #[sea_orm(primary_key, auto_increment = false)]
    pub team: String,
    /// Channel the availability embed is posted to
    pub channel_id: Option<String>,
    /// Message id of the currently live availability embed, if any.
    /// This is the tally target the reaction handler matches against.
    pub message_id: Option<String>,
    /// Role mentioned when a new availability embed is posted
    pub role_id: Option<String>,
    /// Embed title override; defaults to "Scrim Availability" when unset
    pub embed_title: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
