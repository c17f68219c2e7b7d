//! Database configuration module for `ScrimBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! struct definitions without manual SQL.
//!
//! All infrastructure-level database calls go through [`with_retry`]:
//! transient connection failures are retried a fixed number of times with a
//! fixed backoff before the error is allowed to propagate.

use crate::entities::{LogSettings, ScheduleEvent, ScheduleSettings, ScrimEmojis, ScrimSettings};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;
use tracing::warn;

/// How many times a transiently failing operation is attempted in total.
const MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between attempts.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Whether an error belongs to the transient connection class worth retrying.
/// Query-shaped errors (constraint violations, bad SQL) are never retried.
#[must_use]
pub const fn is_transient(err: &Error) -> bool {
    matches!(
        err,
        Error::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
    )
}

/// Runs a database operation, retrying transient connection errors up to
/// [`MAX_ATTEMPTS`] times with a [`RETRY_BACKOFF`] pause between attempts.
/// Any other error, or a transient error on the final attempt, propagates.
pub async fn with_retry<T, F, Fut>(mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) && attempt < MAX_ATTEMPTS => {
                warn!(
                    "Transient database error (attempt {attempt}/{MAX_ATTEMPTS}), retrying: {err}"
                );
                attempt += 1;
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Establishes a connection using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is
/// set. Connection establishment itself is retried like any other transient
/// operation.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/scrim_buddy.sqlite?mode=rwc".to_string());

    with_retry(|| async { Database::connect(&database_url).await.map_err(Error::from) }).await
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to run on every startup: each statement carries `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(ScheduleEvent),
        schema.create_table_from_entity(ScheduleSettings),
        schema.create_table_from_entity(ScrimSettings),
        schema.create_table_from_entity(ScrimEmojis),
        schema.create_table_from_entity(LogSettings),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ScheduleEventModel, ScrimSettingsModel};
    use crate::errors::Error;
    use sea_orm::{EntityTrait, QuerySelect, RuntimeErr};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ScheduleEventModel> = ScheduleEvent::find().limit(1).all(&db).await?;
        let _: Vec<ScrimSettingsModel> = ScrimSettings::find().limit(1).all(&db).await?;

        // Creating again must be a no-op, not a "table already exists" error
        create_tables(&db).await?;

        Ok(())
    }

    fn transient() -> Error {
        Error::Database(DbErr::Conn(RuntimeErr::Internal(
            "connection reset".to_string(),
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_recovers_from_transient_errors() -> Result<()> {
        let calls = AtomicU32::new(0);

        let value = with_retry(|| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(transient())
                } else {
                    Ok(42_u32)
                }
            }
        })
        .await?;

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<u32> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_does_not_retry_query_errors() {
        let calls = AtomicU32::new(0);

        let result: Result<u32> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Database(DbErr::Custom("constraint violation".to_string()))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
