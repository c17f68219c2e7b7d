//! Message-id to tally-target classification.
//!
//! A reaction event only matters if its message is one the bot maintains:
//! either a team's live scrim availability embed, or the announcement embed
//! of a schedule event. The stored message-id columns form a small fixed set
//! per guild, so classification is a handful of indexed lookups; anything
//! that matches nothing is not a tally event and is dropped.

use crate::core::{schedule, scrim};
use crate::entities::{ScheduleEventModel, Team};
use crate::errors::Result;
use sea_orm::DatabaseConnection;

/// What a reacted-on message turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum TallyTarget {
    /// A team's scrim availability embed (headcount tally, live reactions)
    Scrim {
        /// Which team's embed was hit
        team: Team,
    },
    /// A schedule event's announcement embed (confirmation tally, persisted
    /// participant list)
    Announcement(ScheduleEventModel),
}

/// Resolves a message id against the guild's known tally targets.
/// Message ids are globally unique on Discord, so the first match wins.
pub async fn classify_message(
    db: &DatabaseConnection,
    guild_id: &str,
    message_id: &str,
) -> Result<Option<TallyTarget>> {
    for settings in scrim::all_settings(db, guild_id).await? {
        if settings.message_id.as_deref() == Some(message_id) {
            if let Some(team) = Team::from_column(&settings.team) {
                return Ok(Some(TallyTarget::Scrim { team }));
            }
        }
    }

    if let Some(event) = schedule::find_by_announcement(db, guild_id, message_id).await? {
        return Ok(Some(TallyTarget::Announcement(event)));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_event, setup_test_db};

    #[tokio::test]
    async fn test_classifies_scrim_message_per_team() -> Result<()> {
        let db = setup_test_db().await?;

        scrim::set_message(&db, "g1", Team::Mixed, Some("msg-mixed")).await?;
        scrim::set_message(&db, "g1", Team::Clan, Some("msg-clan")).await?;

        let target = classify_message(&db, "g1", "msg-clan").await?;
        assert_eq!(target, Some(TallyTarget::Scrim { team: Team::Clan }));

        let target = classify_message(&db, "g1", "msg-mixed").await?;
        assert_eq!(target, Some(TallyTarget::Scrim { team: Team::Mixed }));

        Ok(())
    }

    #[tokio::test]
    async fn test_classifies_announcement_message() -> Result<()> {
        let db = setup_test_db().await?;

        let event =
            create_test_event(&db, "g1", Team::Female, "Finals", "01/03/25", "20:00").await?;
        let event = schedule::mark_announced(&db, event, "msg-announce").await?;

        let target = classify_message(&db, "g1", "msg-announce").await?;
        match target {
            Some(TallyTarget::Announcement(found)) => {
                assert_eq!(found.id, event.id);
                assert_eq!(found.event_name, "Finals");
            }
            other => panic!("expected announcement target, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_message_is_not_a_target() -> Result<()> {
        let db = setup_test_db().await?;

        scrim::set_message(&db, "g1", Team::Mixed, Some("msg-mixed")).await?;
        assert_eq!(classify_message(&db, "g1", "msg-other").await?, None);

        // A target from another guild never matches
        assert_eq!(classify_message(&db, "g2", "msg-mixed").await?, None);

        Ok(())
    }
}
