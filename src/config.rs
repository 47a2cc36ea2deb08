//! Configuration management for the link expander bot.

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::access::OperatorConfig;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
    /// The single guild the expand command is registered on
    pub home_guild_id: u64,
    /// Operator access configuration
    #[serde(default)]
    pub operators: OperatorConfig,
}

/// Environment access seam so config loading can be tested without
/// touching the process environment.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment.
pub struct ProcessEnv;

impl ReadEnv for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&ProcessEnv)
    }

    pub fn from_env_impl(env: &impl ReadEnv) -> Result<Self> {
        let bot_token = env
            .var("DISCORD_BOT_TOKEN")
            .context("DISCORD_BOT_TOKEN not set")?;

        let home_guild_id = env
            .var("DISCORD_HOME_GUILD_ID")
            .context("DISCORD_HOME_GUILD_ID not set")?
            .parse::<u64>()
            .context("DISCORD_HOME_GUILD_ID is not a valid guild ID")?;

        let operator_users =
            parse_id_list(&env.var("DISCORD_OPERATOR_USERS").unwrap_or_default());
        let operator_roles =
            parse_id_list(&env.var("DISCORD_OPERATOR_ROLES").unwrap_or_default());

        Ok(Config {
            discord: DiscordBotConfig {
                bot_token,
                home_guild_id,
                operators: OperatorConfig {
                    operator_users,
                    operator_roles,
                },
            },
        })
    }
}

fn default_bot_token() -> String {
    std::env::var("DISCORD_BOT_TOKEN").unwrap_or_default()
}

fn parse_id_list(s: &str) -> Vec<u64> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .filter_map(|x| x.parse::<u64>().ok())
        .collect()
}
