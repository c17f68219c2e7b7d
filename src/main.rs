use dotenvy::dotenv;
use scrim_buddy::{bot, config, errors::Result};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ensured."))
        .inspect_err(|e| error!("Failed to create database tables: {}", e))?;

    // 4. Run the bot. DISCORD_BOT_TOKEN is loaded here, directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))?;

    bot::run_bot(token, db).await?;

    Ok(())
}
