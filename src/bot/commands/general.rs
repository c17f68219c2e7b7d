//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    ///
    /// This command provides users with information about all available bot commands
    /// and their usage, helping them understand the bot's capabilities.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**ScrimBuddy Help**\n\
        Here is a summary of all available commands for ScrimBuddy.\n\n\
        **Scrim Commands**\n\
        • `/scrim channel <channel>` - Sets the channel for the availability embed.\n\
        • `/scrim emojis <16> <20> <23>` - Sets the three headcount reaction emojis.\n\
        • `/scrim send` - Posts the availability embed and seeds its reactions.\n\
        • `/scrim fix` - Rebuilds the embed from the live reaction lists.\n\n\
        **Schedule Commands**\n\
        • `/schedule add <name> <date> <time>` - Adds an event (DD/MM/YY, HH:MM).\n\
        • `/schedule remove <id>` - Removes the event with that display id.\n\
        • `/schedule edit <id> <field> <value>` - Edits an event's name, date or time.\n\
        • `/schedule setstatus <id> <status>` - Updates an event's status.\n\
        • `/schedule channel <type> <channel>` - Sets the schedule or announcements channel.\n\n\
        **Utility Commands**\n\
        • `/logs channel <channel>` - Sets the action-log channel.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Event ids are shown on the left side of the schedule embed and are \
        renumbered whenever the schedule changes - always read them off the \
        current embed.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
