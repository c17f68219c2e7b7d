//! Action-log settings and the colour map for log embeds.

use crate::entities::{LogSettings, LogSettingsModel, log_settings};
use crate::errors::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Default title for the log embed when none is configured.
pub const DEFAULT_LOG_TITLE: &str = "Team Manager Logs";

/// Kind of action a log embed reports, fixing its accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    /// Something was added (green)
    Add,
    /// Something was edited or reconfigured (orange)
    Edit,
    /// Something was removed (red)
    Remove,
    /// A condition worth an admin's attention (yellow)
    Warning,
    /// Anything else (white)
    Default,
}

impl LogAction {
    /// The embed accent colour for this action.
    #[must_use]
    pub const fn colour(self) -> u32 {
        match self {
            LogAction::Add => 0x0000_FF00,
            LogAction::Edit => 0x00FF_A500,
            LogAction::Remove => 0x00FF_0000,
            LogAction::Warning => 0x00FF_FF00,
            LogAction::Default => 0x00FF_FFFF,
        }
    }
}

/// Fetches a guild's log settings, if any are stored.
pub async fn get_settings(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Option<LogSettingsModel>> {
    LogSettings::find_by_id(guild_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets the channel log embeds are delivered to.
pub async fn set_channel(
    db: &DatabaseConnection,
    guild_id: &str,
    channel_id: &str,
) -> Result<LogSettingsModel> {
    let model = match get_settings(db, guild_id).await? {
        Some(existing) => {
            let mut active: log_settings::ActiveModel = existing.into();
            active.channel_id = Set(Some(channel_id.to_string()));
            active.update(db).await?
        }
        None => {
            let active = log_settings::ActiveModel {
                guild_id: Set(guild_id.to_string()),
                channel_id: Set(Some(channel_id.to_string())),
                embed_title: Set(None),
            };
            active.insert(db).await?
        }
    };
    Ok(model)
}

/// Sets the log embed title.
pub async fn set_title(
    db: &DatabaseConnection,
    guild_id: &str,
    title: &str,
) -> Result<LogSettingsModel> {
    let model = match get_settings(db, guild_id).await? {
        Some(existing) => {
            let mut active: log_settings::ActiveModel = existing.into();
            active.embed_title = Set(Some(title.to_string()));
            active.update(db).await?
        }
        None => {
            let active = log_settings::ActiveModel {
                guild_id: Set(guild_id.to_string()),
                channel_id: Set(None),
                embed_title: Set(Some(title.to_string())),
            };
            active.insert(db).await?
        }
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_settings_upsert() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(get_settings(&db, "g1").await?.is_none());

        let created = set_channel(&db, "g1", "c1").await?;
        assert_eq!(created.channel_id.as_deref(), Some("c1"));
        assert_eq!(created.embed_title, None);

        let updated = set_title(&db, "g1", "Ops Log").await?;
        assert_eq!(updated.channel_id.as_deref(), Some("c1"));
        assert_eq!(updated.embed_title.as_deref(), Some("Ops Log"));

        Ok(())
    }

    #[test]
    fn test_colour_map() {
        assert_eq!(LogAction::Add.colour(), 0x0000_FF00);
        assert_eq!(LogAction::Remove.colour(), 0x00FF_0000);
        assert_eq!(LogAction::Default.colour(), 0x00FF_FFFF);
    }
}
