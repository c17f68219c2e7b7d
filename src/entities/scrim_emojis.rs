//! Scrim emoji entity - the three headcount reaction emojis per guild.
//!
//! Each emoji is stored exactly as the admin supplied it: either a custom
//! emoji mention like `<:sixteen:123456789>` or a literal unicode emoji. The
//! tally engine refuses to act until all three slots are configured.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Scrim emoji configuration database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scrim_emojis")]
pub struct Model {
    /// Discord guild this configuration belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Emoji for the "16 Players" headcount bracket
    pub emoji_16: Option<String>,
    /// Emoji for the "20 Players" headcount bracket
    pub emoji_20: Option<String>,
    /// Emoji for the "23 Players" headcount bracket
    pub emoji_23: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
