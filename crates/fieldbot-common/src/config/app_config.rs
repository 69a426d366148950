//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if
//! present).

use serde::Deserialize;
use std::env;

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub app: AppSettings,
    pub discord: DiscordConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Discord credentials and targets
///
/// The bot operates against a single guild and answers commands in a single
/// channel.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token (sent as `Authorization: Bot <token>`)
    pub bot_token: String,
    /// Guild whose members the bot manages
    pub guild_id: String,
    /// Channel the bot listens to and replies in
    pub channel_id: String,
    /// REST API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

// Default value functions
fn default_app_name() -> String {
    "fieldbot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_api_base() -> String {
    "https://discord.com/api/v6".to_string()
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            discord: DiscordConfig {
                bot_token: env::var("DISCORD_BOT_TOKEN")
                    .map_err(|_| ConfigError::MissingVar("DISCORD_BOT_TOKEN"))?,
                guild_id: env::var("DISCORD_GUILD_ID")
                    .map_err(|_| ConfigError::MissingVar("DISCORD_GUILD_ID"))?,
                channel_id: env::var("DISCORD_CHANNEL_ID")
                    .map_err(|_| ConfigError::MissingVar("DISCORD_CHANNEL_ID"))?,
                api_base: env::var("DISCORD_API_BASE").unwrap_or_else(|_| default_api_base()),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
