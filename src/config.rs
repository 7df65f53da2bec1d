use crate::domain::Percent;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub order_ledger_api_url: String,
    /// Margin subtracted from a referrer's percent when a new member
    /// attaches, floored at zero. Zero means new members inherit the
    /// referrer's percent unchanged.
    pub attach_margin_percent: Percent,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let order_ledger_api_url = env_map
            .get("ORDER_LEDGER_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("ORDER_LEDGER_API_URL".to_string()))?;

        let attach_margin_percent = Percent::from_str_canonical(
            env_map
                .get("ATTACH_MARGIN_PERCENT")
                .map(|s| s.as_str())
                .unwrap_or("0"),
        )
        .map_err(|_| {
            ConfigError::InvalidValue(
                "ATTACH_MARGIN_PERCENT".to_string(),
                "must be a percent in 0..=100".to_string(),
            )
        })?;

        Ok(Config {
            port,
            database_path,
            order_ledger_api_url,
            attach_margin_percent,
        })
    }
}
