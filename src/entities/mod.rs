//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod log_settings;
pub mod schedule_event;
pub mod schedule_settings;
pub mod scrim_emojis;
pub mod scrim_settings;
pub mod team;

// Re-export specific types to avoid conflicts
pub use log_settings::{
    Column as LogSettingsColumn, Entity as LogSettings, Model as LogSettingsModel,
};
pub use schedule_event::{
    Column as ScheduleEventColumn, Entity as ScheduleEvent, EventStatus,
    Model as ScheduleEventModel,
};
pub use schedule_settings::{
    Column as ScheduleSettingsColumn, Entity as ScheduleSettings, Model as ScheduleSettingsModel,
};
pub use scrim_emojis::{
    Column as ScrimEmojisColumn, Entity as ScrimEmojis, Model as ScrimEmojisModel,
};
pub use scrim_settings::{
    Column as ScrimSettingsColumn, Entity as ScrimSettings, Model as ScrimSettingsModel,
};
pub use team::Team;
