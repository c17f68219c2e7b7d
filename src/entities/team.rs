//! Team discriminant shared by the scrim and schedule tables.
//!
//! The original deployment ran one table per team roster; here the team is a
//! column, so every query takes a `Team` and the schema exists once.

use std::fmt;

/// The closed set of team rosters a guild can manage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    /// The default mixed roster
    Mixed,
    /// The female roster
    Female,
    /// The clan roster
    Clan,
}

impl Team {
    /// All teams, in the order settings rows are scanned.
    pub const ALL: [Team; 3] = [Team::Mixed, Team::Female, Team::Clan];

    /// The value stored in `team` columns.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Team::Mixed => "mixed",
            Team::Female => "female",
            Team::Clan => "clan",
        }
    }

    /// Human-readable name for replies and log embeds.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Team::Mixed => "Mixed",
            Team::Female => "Female",
            Team::Clan => "Clan",
        }
    }

    /// Parses a stored column value back into a team.
    #[must_use]
    pub fn from_column(value: &str) -> Option<Self> {
        Team::ALL.into_iter().find(|team| team.as_str() == value)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_round_trip() {
        for team in Team::ALL {
            assert_eq!(Team::from_column(team.as_str()), Some(team));
        }
        assert_eq!(Team::from_column("unknown"), None);
    }
}
