//! Dense display-id reindexing for schedule events.
//!
//! Display ids must stay `1..N` in chronological order so users can address
//! events with the small numbers shown on the schedule embed. After any
//! insert, delete, or date/time edit the collection is re-materialized: rows
//! are read in (date, time) order, re-numbered from 1, and swapped in as a
//! single transaction. A concurrent reader can never observe the half-empty
//! intermediate state; on any failure the transaction rolls back and the old
//! numbering survives intact.
//!
//! Ids are therefore unstable across mutations by design: an id printed in an
//! older message may refer to a different event after the next change. The
//! command replies tell users to read ids off the current schedule embed.
//!
//! Callers serialize runs per guild via `BotData::reindex_locks`; the
//! transaction below protects integrity, not ordering, of concurrent calls.

use crate::entities::{
    ScheduleEvent, ScheduleEventColumn, ScheduleEventModel, Team, schedule_event,
};
use crate::errors::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

/// Reassigns display ids for a guild/team so that active rows are numbered
/// exactly `1..N` by (date, time), ties broken by previous id (stable).
/// Every non-id column is preserved unchanged. Returns the number of rows
/// written; zero events is a logged no-op.
pub async fn reindex_events(db: &DatabaseConnection, guild_id: &str, team: Team) -> Result<usize> {
    let events = ScheduleEvent::find()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .order_by_asc(ScheduleEventColumn::EventDate)
        .order_by_asc(ScheduleEventColumn::EventTime)
        .order_by_asc(ScheduleEventColumn::Id)
        .all(db)
        .await?;

    if events.is_empty() {
        debug!("No events to reindex for guild {guild_id} ({team})");
        return Ok(0);
    }

    let count = events.len();
    let txn = db.begin().await?;

    ScheduleEvent::delete_many()
        .filter(ScheduleEventColumn::GuildId.eq(guild_id))
        .filter(ScheduleEventColumn::Team.eq(team.as_str()))
        .exec(&txn)
        .await?;

    let renumbered = (1..).zip(events).map(|(new_id, event)| renumber(event, new_id));
    ScheduleEvent::insert_many(renumbered).exec(&txn).await?;

    txn.commit().await?;
    Ok(count)
}

fn renumber(event: ScheduleEventModel, new_id: i32) -> schedule_event::ActiveModel {
    schedule_event::ActiveModel {
        guild_id: Set(event.guild_id),
        team: Set(event.team),
        id: Set(new_id),
        event_name: Set(event.event_name),
        event_date: Set(event.event_date),
        event_time: Set(event.event_time),
        announcement_message_id: Set(event.announcement_message_id),
        participants: Set(event.participants),
        created_by: Set(event.created_by),
        status: Set(event.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schedule::{list_events, remove_event};
    use crate::test_utils::{create_test_event, setup_test_db};

    #[tokio::test]
    async fn test_reindex_assigns_ids_by_date_order() -> Result<()> {
        let db = setup_test_db().await?;

        // Inserted out of chronological order: provisional ids 1 and 2
        create_test_event(&db, "g1", Team::Mixed, "Second", "05/01/25", "20:00").await?;
        create_test_event(&db, "g1", Team::Mixed, "First", "01/01/25", "20:00").await?;

        let written = reindex_events(&db, "g1", Team::Mixed).await?;
        assert_eq!(written, 2);

        let events = list_events(&db, "g1", Team::Mixed).await?;
        assert_eq!(events[0].id, 1);
        assert_eq!(events[0].event_name, "First");
        assert_eq!(events[1].id, 2);
        assert_eq!(events[1].event_name, "Second");

        Ok(())
    }

    #[tokio::test]
    async fn test_reindex_closes_gaps_after_delete() -> Result<()> {
        let db = setup_test_db().await?;

        for (name, date) in [("A", "01/01/25"), ("B", "02/01/25"), ("C", "03/01/25")] {
            create_test_event(&db, "g1", Team::Mixed, name, date, "20:00").await?;
        }

        remove_event(&db, "g1", Team::Mixed, 2).await?;
        reindex_events(&db, "g1", Team::Mixed).await?;

        let events = list_events(&db, "g1", Team::Mixed).await?;
        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, [1, 2]);
        let names: Vec<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_reindex_is_dense_for_any_count() -> Result<()> {
        let db = setup_test_db().await?;

        for day in 1..=9 {
            let date = format!("{day:02}/02/25");
            create_test_event(&db, "g1", Team::Clan, "Event", &date, "19:00").await?;
        }
        remove_event(&db, "g1", Team::Clan, 1).await?;
        remove_event(&db, "g1", Team::Clan, 5).await?;
        remove_event(&db, "g1", Team::Clan, 9).await?;

        reindex_events(&db, "g1", Team::Clan).await?;

        let events = list_events(&db, "g1", Team::Clan).await?;
        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=6).collect::<Vec<i32>>());

        Ok(())
    }

    #[tokio::test]
    async fn test_reindex_noop_preserves_rows() -> Result<()> {
        let db = setup_test_db().await?;

        let event =
            create_test_event(&db, "g1", Team::Mixed, "Stable", "01/01/25", "20:00").await?;
        let event = crate::core::schedule::store_participants(
            &db,
            event,
            &["111".to_string(), "222".to_string()],
        )
        .await?;
        let event = crate::core::schedule::mark_announced(&db, event, "msg-1").await?;

        let before = list_events(&db, "g1", Team::Mixed).await?;
        reindex_events(&db, "g1", Team::Mixed).await?;
        let after = list_events(&db, "g1", Team::Mixed).await?;

        assert_eq!(before, after);
        assert_eq!(after[0].participants.as_deref(), Some("111,222"));
        assert_eq!(after[0].announcement_message_id.as_deref(), Some("msg-1"));
        assert_eq!(after[0].created_by, event.created_by);

        Ok(())
    }

    #[tokio::test]
    async fn test_reindex_empty_guild_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(reindex_events(&db, "nobody", Team::Mixed).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_reindex_leaves_other_teams_untouched() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_event(&db, "g1", Team::Mixed, "Mixed B", "05/01/25", "20:00").await?;
        create_test_event(&db, "g1", Team::Mixed, "Mixed A", "01/01/25", "20:00").await?;
        create_test_event(&db, "g1", Team::Female, "Female B", "05/01/25", "20:00").await?;
        create_test_event(&db, "g1", Team::Female, "Female A", "01/01/25", "20:00").await?;

        reindex_events(&db, "g1", Team::Mixed).await?;

        let mixed = list_events(&db, "g1", Team::Mixed).await?;
        assert_eq!(mixed[0].event_name, "Mixed A");
        assert_eq!(mixed[0].id, 1);

        // Female still carries its provisional insertion ids
        let female = list_events(&db, "g1", Team::Female).await?;
        assert_eq!(female[0].event_name, "Female A");
        assert_eq!(female[0].id, 2);

        Ok(())
    }
}
