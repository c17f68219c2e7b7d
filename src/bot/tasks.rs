//! Daily scheduled jobs.
//!
//! Three cron jobs keep guilds current without anyone running a command:
//! the morning scrim embed post, the morning event announcements, and the
//! midnight sweep of completed events. Every job iterates over stored
//! settings rows, so joining or configuring a guild is all it takes to be
//! included in the next run. Per-guild failures are logged and skipped;
//! one broken guild never stalls the rest of the sweep.

use crate::bot::embeds;
use crate::core::{reindex, schedule, scrim, sync::KeyedLocks};
use crate::entities::Team;
use crate::errors::Result;
use poise::serenity_prelude::{EditMessage, Http};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

/// Installs and starts the daily jobs. Called once from the framework setup
/// hook, after the gateway session is established.
pub async fn start_daily_jobs(
    db: DatabaseConnection,
    http: Arc<Http>,
    reindex_locks: Arc<KeyedLocks>,
) -> Result<()> {
    let scheduler = JobScheduler::new().await?;

    // 07:00 - post fresh scrim availability embeds
    let job_db = db.clone();
    let job_http = Arc::clone(&http);
    let scrim_job = Job::new_async("0 0 7 * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = Arc::clone(&job_http);
        Box::pin(async move {
            if let Err(err) = post_daily_scrim_embeds(&db, &http).await {
                error!("Error posting daily scrim embeds: {err}");
            }
        })
    })?;
    scheduler.add(scrim_job).await?;

    // 07:00 - announce today's events
    let job_db = db.clone();
    let job_http = Arc::clone(&http);
    let announce_job = Job::new_async("0 0 7 * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = Arc::clone(&job_http);
        Box::pin(async move {
            if let Err(err) = announce_todays_events(&db, &http).await {
                error!("Error sending event announcements: {err}");
            }
        })
    })?;
    scheduler.add(announce_job).await?;

    // 00:00 - sweep completed events
    let job_db = db;
    let job_http = http;
    let cleanup_job = Job::new_async("0 0 0 * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = Arc::clone(&job_http);
        let locks = Arc::clone(&reindex_locks);
        Box::pin(async move {
            if let Err(err) = cleanup_completed_events(&db, &http, &locks).await {
                error!("Error cleaning up completed events: {err}");
            }
        })
    })?;
    scheduler.add(cleanup_job).await?;

    scheduler.start().await?;
    info!("Daily jobs scheduled");
    Ok(())
}

/// Posts a fresh availability embed for every guild/team with scrim settings.
async fn post_daily_scrim_embeds(db: &DatabaseConnection, http: &Arc<Http>) -> Result<()> {
    info!("Starting scheduled scrim embed posting...");

    for settings in scrim::all_settings_everywhere(db).await? {
        let Some(team) = Team::from_column(&settings.team) else {
            continue;
        };
        if let Err(err) = embeds::post_availability_embed(http, db, &settings.guild_id, team).await
        {
            warn!(
                "Failed to post scrim embed for guild {} ({team}): {err}",
                settings.guild_id
            );
        }
    }
    Ok(())
}

/// Announces today's not-yet-announced events for every configured guild.
async fn announce_todays_events(db: &DatabaseConnection, http: &Arc<Http>) -> Result<()> {
    info!("Running scheduled event announcements...");
    let today = chrono::Local::now().date_naive();

    for settings in schedule::all_settings_everywhere(db).await? {
        let Some(team) = Team::from_column(&settings.team) else {
            continue;
        };
        if settings.announcements_channel_id.is_none() {
            continue;
        }

        let events = match schedule::today_unannounced(db, &settings.guild_id, team, today).await {
            Ok(events) => events,
            Err(err) => {
                warn!(
                    "Failed to load today's events for guild {} ({team}): {err}",
                    settings.guild_id
                );
                continue;
            }
        };

        for event in events {
            if let Err(err) = embeds::announce_event(http, db, &settings, event).await {
                warn!(
                    "Failed to announce event for guild {} ({team}): {err}",
                    settings.guild_id
                );
            }
        }
    }
    Ok(())
}

/// Replaces the announcement embed of each completed event with a removal
/// notice, deletes the rows, reindexes and refreshes the schedule embed.
async fn cleanup_completed_events(
    db: &DatabaseConnection,
    http: &Arc<Http>,
    reindex_locks: &KeyedLocks,
) -> Result<()> {
    info!("Running cleanup for completed events...");

    for settings in schedule::all_settings_everywhere(db).await? {
        let Some(team) = Team::from_column(&settings.team) else {
            continue;
        };
        let guild_id = settings.guild_id.clone();

        let completed = match schedule::completed_events(db, &guild_id, team).await {
            Ok(events) => events,
            Err(err) => {
                warn!("Failed to load completed events for guild {guild_id} ({team}): {err}");
                continue;
            }
        };
        if completed.is_empty() {
            continue;
        }

        for event in &completed {
            let (Some(channel), Some(message)) = (
                settings
                    .announcements_channel_id
                    .as_deref()
                    .and_then(embeds::parse_channel),
                event
                    .announcement_message_id
                    .as_deref()
                    .and_then(embeds::parse_message),
            ) else {
                continue;
            };

            let notice = match http.get_message(channel, message).await {
                Ok(posted) => posted.embeds.first().map(|embed| {
                    embeds::rebuild_embed(
                        embed,
                        vec![(
                            "Event Status".to_string(),
                            "Event Completed & Removed".to_string(),
                            false,
                        )],
                    )
                }),
                Err(err) => {
                    warn!("Failed to fetch announcement {message} in guild {guild_id}: {err}");
                    None
                }
            };
            if let Some(embed) = notice {
                let edit = EditMessage::new().embed(embed);
                if let Err(err) = http.edit_message(channel, message, &edit, vec![]).await {
                    warn!("Failed to update announcement {message} in guild {guild_id}: {err}");
                }
            }
        }

        let removed = {
            let _guard = reindex_locks.acquire(&guild_id).await;
            let removed = schedule::delete_completed(db, &guild_id, team).await?;
            reindex::reindex_events(db, &guild_id, team).await?;
            removed
        };
        embeds::refresh_schedule_embed(http, db, &guild_id, team).await?;
        info!("Deleted {removed} completed events for guild {guild_id} ({team})");
    }
    Ok(())
}
