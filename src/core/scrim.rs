//! Scrim business logic - availability settings and emoji configuration.

use crate::entities::{
    ScrimEmojis, ScrimEmojisModel, ScrimSettings, ScrimSettingsModel, Team, scrim_emojis,
    scrim_settings,
};
use crate::errors::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Default title for the availability embed when none is configured.
pub const DEFAULT_SCRIM_TITLE: &str = "Scrim Availability";

/// Description line under the availability embed title.
pub const SCRIM_EMBED_DESCRIPTION: &str = "React to the time slots you can play.";

/// Fetches the scrim settings row for a guild/team, if any.
pub async fn get_settings(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
) -> Result<Option<ScrimSettingsModel>> {
    ScrimSettings::find_by_id((guild_id.to_string(), team.as_str().to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All scrim settings rows for a guild, across teams. Used by the reaction
/// classifier to match message ids and by the daily posting job.
pub async fn all_settings(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Vec<ScrimSettingsModel>> {
    ScrimSettings::find()
        .filter(scrim_settings::Column::GuildId.eq(guild_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every scrim settings row in the database, for the daily posting job.
pub async fn all_settings_everywhere(db: &DatabaseConnection) -> Result<Vec<ScrimSettingsModel>> {
    ScrimSettings::find().all(db).await.map_err(Into::into)
}

async fn update_settings<F>(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    apply: F,
) -> Result<ScrimSettingsModel>
where
    F: FnOnce(&mut scrim_settings::ActiveModel),
{
    let existing = get_settings(db, guild_id, team).await?;
    let is_update = existing.is_some();

    let mut active: scrim_settings::ActiveModel = match existing {
        Some(model) => model.into(),
        None => scrim_settings::ActiveModel {
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

/// Sets the channel the availability embed is posted to.
pub async fn set_channel(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    channel_id: &str,
) -> Result<ScrimSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.channel_id = Set(Some(channel_id.to_string()));
    })
    .await
}

/// Stores (or clears) the message id of the live availability embed.
pub async fn set_message(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    message_id: Option<&str>,
) -> Result<ScrimSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.message_id = Set(message_id.map(ToString::to_string));
    })
    .await
}

/// Sets the role mentioned when a new availability embed is posted.
pub async fn set_role(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    role_id: &str,
) -> Result<ScrimSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.role_id = Set(Some(role_id.to_string()));
    })
    .await
}

/// Sets the availability embed title.
pub async fn set_title(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    title: &str,
) -> Result<ScrimSettingsModel> {
    update_settings(db, guild_id, team, |active| {
        active.embed_title = Set(Some(title.to_string()));
    })
    .await
}

/// Fetches a guild's emoji configuration, if any is stored.
pub async fn get_emojis(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Option<ScrimEmojisModel>> {
    ScrimEmojis::find_by_id(guild_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Stores the three headcount emojis for a guild, replacing any previous
/// configuration.
pub async fn set_emojis(
    db: &DatabaseConnection,
    guild_id: &str,
    emoji_16: &str,
    emoji_20: &str,
    emoji_23: &str,
) -> Result<ScrimEmojisModel> {
    let existing = get_emojis(db, guild_id).await?;
    let is_update = existing.is_some();

    let mut active: scrim_emojis::ActiveModel = match existing {
        Some(model) => model.into(),
        None => scrim_emojis::ActiveModel {
            guild_id: Set(guild_id.to_string()),
            ..Default::default()
        },
    };
    active.emoji_16 = Set(Some(emoji_16.to_string()));
    active.emoji_20 = Set(Some(emoji_20.to_string()));
    active.emoji_23 = Set(Some(emoji_23.to_string()));

    let model = if is_update {
        active.update(db).await?
    } else {
        active.insert(db).await?
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_settings_upsert_per_team() -> Result<()> {
        let db = setup_test_db().await?;

        set_channel(&db, "g1", Team::Mixed, "chan-mixed").await?;
        set_channel(&db, "g1", Team::Female, "chan-female").await?;
        set_title(&db, "g1", Team::Mixed, "Mixed Scrims").await?;

        let mixed = get_settings(&db, "g1", Team::Mixed).await?.unwrap();
        assert_eq!(mixed.channel_id.as_deref(), Some("chan-mixed"));
        assert_eq!(mixed.embed_title.as_deref(), Some("Mixed Scrims"));

        let female = get_settings(&db, "g1", Team::Female).await?.unwrap();
        assert_eq!(female.channel_id.as_deref(), Some("chan-female"));
        assert_eq!(female.embed_title, None);

        assert_eq!(all_settings(&db, "g1").await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_message_id_can_be_cleared() -> Result<()> {
        let db = setup_test_db().await?;

        set_message(&db, "g1", Team::Mixed, Some("msg-1")).await?;
        let stored = get_settings(&db, "g1", Team::Mixed).await?.unwrap();
        assert_eq!(stored.message_id.as_deref(), Some("msg-1"));

        set_message(&db, "g1", Team::Mixed, None).await?;
        let cleared = get_settings(&db, "g1", Team::Mixed).await?.unwrap();
        assert_eq!(cleared.message_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_emoji_config_replaces_previous() -> Result<()> {
        let db = setup_test_db().await?;

        set_emojis(&db, "g1", "<:a:1>", "<:b:2>", "<:c:3>").await?;
        let first = get_emojis(&db, "g1").await?.unwrap();
        assert_eq!(first.emoji_16.as_deref(), Some("<:a:1>"));

        set_emojis(&db, "g1", "<:x:7>", "<:y:8>", "<:z:9>").await?;
        let second = get_emojis(&db, "g1").await?.unwrap();
        assert_eq!(second.emoji_16.as_deref(), Some("<:x:7>"));
        assert_eq!(second.emoji_23.as_deref(), Some("<:z:9>"));

        Ok(())
    }
}
