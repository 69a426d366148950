//! fieldbot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p fieldbot-gateway
//! ```
//!
//! Configuration is loaded from environment variables (`DISCORD_BOT_TOKEN`,
//! `DISCORD_GUILD_ID`, `DISCORD_CHANNEL_ID`).

use fieldbot_common::{try_init_tracing, BotConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the bot
    if let Err(e) = run().await {
        error!(error = %e, "fieldbot failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting fieldbot...");

    // Load configuration
    let config = BotConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        guild_id = %config.discord.guild_id,
        channel_id = %config.discord.channel_id,
        "Configuration loaded"
    );

    // Run the gateway session until the socket closes
    fieldbot_gateway::run(config).await?;

    Ok(())
}
