//! Shared test utilities for `ScrimBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::schedule,
    entities::{ScheduleEventModel, Team},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a schedule event from user-format date/time strings.
///
/// # Arguments
/// * `db` - Database connection
/// * `guild_id` - Guild the event belongs to
/// * `team` - Team roster
/// * `name` - Event name
/// * `date` - Event date in `DD/MM/YY` form
/// * `time` - Event time in `HH:MM` form
///
/// # Defaults
/// * `created_by`: `"test_user"`
pub async fn create_test_event(
    db: &DatabaseConnection,
    guild_id: &str,
    team: Team,
    name: &str,
    date: &str,
    time: &str,
) -> Result<ScheduleEventModel> {
    schedule::add_event(
        db,
        guild_id,
        team,
        name,
        schedule::parse_event_date(date)?,
        schedule::parse_event_time(time)?,
        "test_user",
    )
    .await
}
