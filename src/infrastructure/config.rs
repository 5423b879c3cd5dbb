//! Application configuration

use std::env;

use anyhow::{Context, Result};

use crate::application::ports::outbound::ListQuery;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,

    /// Record store (PocketBase) base URL. Without one an in-memory store is used.
    pub store_url: Option<String>,

    /// Discord webhook for roll announcements; unset disables notifications
    pub discord_webhook_url: Option<String>,
    /// Channel the webhook posts into
    pub discord_channel_id: Option<String>,
    /// Base URL of the roll detail link in announcements
    pub roll_link_base_url: String,

    /// Page size of the cached roll history
    pub history_per_page: u32,

    /// Seed for a reproducible dice sequence
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let history_per_page = match get("ROLLER_HISTORY_PER_PAGE") {
            Some(value) => value
                .parse()
                .context("ROLLER_HISTORY_PER_PAGE must be a positive integer")?,
            None => ListQuery::DEFAULT_PER_PAGE,
        };
        anyhow::ensure!(
            history_per_page > 0,
            "ROLLER_HISTORY_PER_PAGE must be a positive integer"
        );

        Ok(Self {
            server_port: get("SERVER_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            store_url: get("ROLLER_STORE_URL"),

            discord_webhook_url: get("DISCORD_WEBHOOK_URL"),
            discord_channel_id: get("DISCORD_CHANNEL_ID"),
            roll_link_base_url: get("ROLL_LINK_BASE_URL")
                .unwrap_or_else(|| "http://blackbirdsroller.com/".to_string()),

            history_per_page,

            rng_seed: get("ROLLER_RNG_SEED")
                .map(|value| value.parse())
                .transpose()
                .context("ROLLER_RNG_SEED must be an unsigned integer")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.store_url, None);
        assert_eq!(config.discord_webhook_url, None);
        assert_eq!(config.roll_link_base_url, "http://blackbirdsroller.com/");
        assert_eq!(config.history_per_page, 25);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let config = config(&[
            ("SERVER_PORT", "8080"),
            ("ROLLER_STORE_URL", "http://127.0.0.1:8090"),
            ("DISCORD_WEBHOOK_URL", "  "),
            ("ROLLER_RNG_SEED", "42"),
        ])
        .unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.store_url.as_deref(), Some("http://127.0.0.1:8090"));
        assert_eq!(config.discord_webhook_url, None);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("SERVER_PORT", "http")]).is_err());
        assert!(config(&[("ROLLER_HISTORY_PER_PAGE", "0")]).is_err());
        assert!(config(&[("ROLLER_RNG_SEED", "-1")]).is_err());
    }
}
