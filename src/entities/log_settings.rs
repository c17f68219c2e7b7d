//! Log settings entity - where a guild's action-log embeds are delivered.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Log settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "log_settings")]
pub struct Model {
    /// Discord guild these settings belong to
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Channel action-log embeds are sent to; logging is skipped when unset
    pub channel_id: Option<String>,
    /// Embed title override; defaults to "Team Manager Logs" when unset
    pub embed_title: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
