// Centralized configuration for the squad stats bot

use std::time::Duration;

use thiserror::Error;

/// Default third-party stats API
pub const DEFAULT_STATS_API_BASE: &str = "https://api.gametools.network";
pub const DEFAULT_STATS_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;

/// Placeholders used when the API leaves something out
pub const UNKNOWN_PLAYER: &str = "Unknown Soldier";
pub const NOT_AVAILABLE: &str = "N/A";

/// Discord embed colors
pub mod colors {
    pub const SUCCESS: u32 = 0x2ecc71;
    pub const ERROR: u32 = 0xff0000;
    pub const WARNING: u32 = 0xffa500;
    pub const INFO: u32 = 0x3498db;
    pub const LEADERBOARD: u32 = 0xf1c40f;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Hex ed25519 key for the HTTP interactions endpoint
    pub public_key: Option<String>,
    pub port: u16,
    pub leaderboard_channel_id: Option<u64>,
    pub leaderboard_interval: Duration,
    pub stats_api_base: String,
    pub stats_timeout: Duration,
    pub roster_path: Option<String>,
    /// Handles shown on the leaderboard, None means the whole roster
    pub squad_handles: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let public_key = get("PUBLIC_KEY");
        if let Some(key) = &public_key {
            if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid {
                    name: "PUBLIC_KEY",
                    value: key.clone(),
                });
            }
        }

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let leaderboard_channel_id = get("LEADERBOARD_CHANNEL_ID")
            .map(|v| parse_value(&v, "LEADERBOARD_CHANNEL_ID"))
            .transpose()?
            .filter(|&id: &u64| id != 0);
        let interval_minutes: u64 = parse_or(
            get("LEADERBOARD_INTERVAL_MINUTES"),
            "LEADERBOARD_INTERVAL_MINUTES",
            DEFAULT_INTERVAL_MINUTES,
        )?;
        if interval_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "LEADERBOARD_INTERVAL_MINUTES",
                value: "0".to_string(),
            });
        }
        let timeout_secs: u64 = parse_or(
            get("STATS_TIMEOUT_SECS"),
            "STATS_TIMEOUT_SECS",
            DEFAULT_STATS_TIMEOUT_SECS,
        )?;

        let squad_handles = get("SQUAD_HANDLES").map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            discord_token,
            public_key,
            port,
            leaderboard_channel_id,
            leaderboard_interval: Duration::from_secs(interval_minutes * 60),
            stats_api_base: get("STATS_API_BASE")
                .unwrap_or_else(|| DEFAULT_STATS_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            stats_timeout: Duration::from_secs(timeout_secs.max(1)),
            roster_path: get("ROSTER_PATH"),
            squad_handles,
        })
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => parse_value(&v, name),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.port, 3000);
        assert_eq!(config.public_key, None);
        assert_eq!(config.leaderboard_channel_id, None);
        assert_eq!(config.leaderboard_interval, Duration::from_secs(3600));
        assert_eq!(config.stats_api_base, DEFAULT_STATS_API_BASE);
        assert_eq!(config.stats_timeout, Duration::from_secs(5));
        assert_eq!(config.squad_handles, None);
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
        assert_eq!(
            config_from(&[("DISCORD_TOKEN", "  ")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
    }

    #[test]
    fn test_overrides() {
        let key = "a".repeat(64);
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("PUBLIC_KEY", key.as_str()),
            ("PORT", "8080"),
            ("LEADERBOARD_CHANNEL_ID", "123456789"),
            ("LEADERBOARD_INTERVAL_MINUTES", "15"),
            ("STATS_API_BASE", "http://localhost:9000/"),
            ("SQUAD_HANDLES", "Alpha, Bravo,,Charlie "),
        ])
        .unwrap();
        assert_eq!(config.public_key.as_deref(), Some(key.as_str()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.leaderboard_channel_id, Some(123456789));
        assert_eq!(config.leaderboard_interval, Duration::from_secs(900));
        assert_eq!(config.stats_api_base, "http://localhost:9000");
        assert_eq!(
            config.squad_handles,
            Some(vec!["Alpha".to_string(), "Bravo".to_string(), "Charlie".to_string()])
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("LEADERBOARD_INTERVAL_MINUTES", "0")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("PUBLIC_KEY", "xyz")]),
            Err(ConfigError::Invalid { name: "PUBLIC_KEY", .. })
        ));
    }
}
