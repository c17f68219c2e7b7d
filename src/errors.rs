//! Unified error type for `ScrimBuddy`.
//!
//! Expected operational conditions (missing settings, unknown emoji, deleted
//! messages) are handled where they occur and never surface here; this enum
//! covers the failures that callers genuinely need to propagate.

use thiserror::Error;

/// All error conditions the bot can propagate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration value.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what was wrong
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Environment variable lookup failure.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// No schedule event with the given display id exists for the guild/team.
    #[error("Event #{id} not found")]
    EventNotFound {
        /// The display id the caller asked for
        id: i32,
    },

    /// Event date that does not parse as `DD/MM/YY`.
    #[error("Invalid date '{input}', expected DD/MM/YY")]
    InvalidDate {
        /// The rejected user input
        input: String,
    },

    /// Event time that does not parse as `HH:MM`.
    #[error("Invalid time '{input}', expected HH:MM")]
    InvalidTime {
        /// The rejected user input
        input: String,
    },

    /// String formatting failure when building a reply.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Cron scheduler failure when installing the daily jobs.
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Framework(Box::new(value))
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
