//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Action-log settings commands
pub mod logs;

/// Schedule management commands
pub mod schedule;

/// Scrim availability commands
pub mod scrim;

use crate::entities::Team;

// Export the top-level commands registered with the framework
pub use general::{help, ping};
pub use logs::logs;
pub use schedule::schedule;
pub use scrim::scrim;

/// Team option shared by the scrim and schedule command trees. Defaults to
/// the mixed roster when omitted.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum TeamChoice {
    /// The default mixed roster
    #[name = "Mixed"]
    Mixed,
    /// The female roster
    #[name = "Female"]
    Female,
    /// The clan roster
    #[name = "Clan"]
    Clan,
}

impl From<TeamChoice> for Team {
    fn from(choice: TeamChoice) -> Self {
        match choice {
            TeamChoice::Mixed => Team::Mixed,
            TeamChoice::Female => Team::Female,
            TeamChoice::Clan => Team::Clan,
        }
    }
}

/// Resolves the optional team parameter every subcommand takes.
fn team_or_default(choice: Option<TeamChoice>) -> Team {
    choice.map_or(Team::Mixed, Team::from)
}
