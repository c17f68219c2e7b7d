//! Core business logic - framework-agnostic scheduling, tally and settings
//! operations. Nothing in here touches the Discord API; the bot layer feeds
//! these functions with plain data and renders their results.

/// Message-id to tally-target classification
pub mod classify;
/// Action-log settings and colour mapping
pub mod logs;
/// Comma-joined participant list codec
pub mod participants;
/// Dense display-id reindexing for schedule events
pub mod reindex;
/// Schedule event and settings operations
pub mod schedule;
/// Scrim settings and emoji configuration operations
pub mod scrim;
/// Keyed async mutexes for per-message and per-guild serialization
pub mod sync;
/// Reaction tally membership and rendering rules
pub mod tally;
