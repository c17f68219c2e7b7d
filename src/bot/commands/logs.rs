//! Log settings commands - where the action-log embeds go.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, embeds},
        core::logs::{self, LogAction},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Action-log configuration.
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("channel", "title")
    )]
    pub async fn logs(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Sets the channel action-log embeds are delivered to.
    #[poise::command(slash_command)]
    pub async fn channel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel to send log embeds to"] channel: serenity::GuildChannel,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        logs::set_channel(db, &guild, &channel.id.to_string()).await?;

        ctx.say(format!("✅ Log channel set to <#{}>.", channel.id)).await?;

        // The confirmation doubles as the first entry in the new channel
        embeds::send_log_embed(
            &ctx.serenity_context().http,
            db,
            &guild,
            &format!(
                "**Log settings update**\n\nThis channel now receives action logs.\n\n**By:** <@{}>",
                ctx.author().id
            ),
            LogAction::Edit,
        )
        .await;
        Ok(())
    }

    /// Sets the title used on log embeds.
    #[poise::command(slash_command)]
    pub async fn title(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "New log embed title"] title: String,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        if title.trim().is_empty() {
            ctx.say("❌ The title cannot be empty.").await?;
            return Ok(());
        }
        let guild = guild_id.to_string();
        let db = &ctx.data().database;

        ctx.defer_ephemeral().await?;
        logs::set_title(db, &guild, title.trim()).await?;

        ctx.say(format!("✅ Log embed title set to **{}**.", title.trim())).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
