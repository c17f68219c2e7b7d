//! Bot layer - Discord-specific interface and command handlers.
//!
//! This module provides the Discord interface for the `ScrimBuddy`
//! application: all slash commands, the gateway event handler that feeds the
//! reaction tally engine, embed construction, and the daily scheduled jobs.

/// Discord command implementations (scrim, schedule, logs, general)
pub mod commands;
/// Embed builders and shared posting/refresh workflows
pub mod embeds;
/// Gateway event handlers (reaction tally, guild bootstrap)
pub mod handlers;
/// Daily cron jobs (scrim posting, announcements, cleanup)
pub mod tasks;

use crate::errors::{Error, Result};
use crate::core::sync::KeyedLocks;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

/// Shared data available to all bot commands and event handlers.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Per-message mutexes serializing tally embed updates. Two reactions to
    /// the same message must not interleave their fetch/compute/edit steps.
    pub tally_locks: KeyedLocks,
    /// Per-guild mutexes serializing reindex runs. Shared with the midnight
    /// cleanup job, which reindexes outside any command context.
    pub reindex_locks: Arc<KeyedLocks>,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection
    /// and the reindex lock set shared with the daily jobs.
    #[must_use]
    pub fn new(database: DatabaseConnection, reindex_locks: Arc<KeyedLocks>) -> Self {
        Self {
            database,
            tally_locks: KeyedLocks::new(),
            reindex_locks,
        }
    }
}

/// Type alias for the poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds and runs the bot until the gateway connection ends.
pub async fn run_bot(token: String, database: DatabaseConnection) -> Result<()> {
    let scheduler_db = database.clone();
    let reindex_locks = Arc::new(KeyedLocks::new());
    let scheduler_locks = Arc::clone(&reindex_locks);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::scrim(),
                commands::schedule(),
                commands::logs(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                tasks::start_daily_jobs(scheduler_db, Arc::clone(&ctx.http), scheduler_locks)
                    .await?;

                Ok(BotData::new(database, reindex_locks))
            })
        })
        .build();

    // Reaction events require the GUILD_MESSAGE_REACTIONS intent
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
