//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` into strongly-typed structs. API keys are
//! referenced by env-var name in the config and resolved at runtime
//! (after `.env` has been loaded by the binary).

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing::warn;

use crate::types::Sport;

/// Top-level application configuration. Every section is optional in
/// the file; missing ones take their defaults.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub http: HttpConfig,
    pub demo: DemoConfig,
    /// Keyed by sport name (`football`, `nba`, ...).
    pub providers: HashMap<String, ProviderConfig>,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub default_sport: Sport,
    /// Overrides the sport's first predefined league.
    pub default_league: Option<i64>,
    /// Length of the fixture window starting today.
    pub date_window_days: i64,
    /// Offset used for "Today"/"Tomorrow" labels, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DemoConfig {
    /// Sports answered from canned data instead of the live provider.
    pub sports: Vec<Sport>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub favorites_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_sport: Sport::Football,
            default_league: None,
            date_window_days: 7,
            utc_offset_minutes: 0,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("sportsdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { sports: vec![Sport::Football, Sport::Nba] }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { favorites_path: "sportsdesk_favorites.json".to_string() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let key = |env: &str| ProviderConfig { base_url: None, api_key_env: Some(env.to_string()) };
        Self {
            session: SessionConfig::default(),
            http: HttpConfig::default(),
            demo: DemoConfig::default(),
            providers: HashMap::from([
                (Sport::Football.key().to_string(), key("FOOTBALL_DATA_API_KEY")),
                (Sport::Nba.key().to_string(), key("BALLDONTLIE_API_KEY")),
            ]),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            warn!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    pub fn provider(&self, sport: Sport) -> Option<&ProviderConfig> {
        self.providers.get(sport.key())
    }

    /// The API key for `sport`, if one is configured and set.
    pub fn api_key(&self, sport: Sport) -> Option<SecretString> {
        let env_name = self.provider(sport)?.api_key_env.as_deref()?;
        Self::resolve_env(env_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(SecretString::new)
    }

    pub fn utc_offset(&self) -> FixedOffset {
        let minutes = self.session.utc_offset_minutes;
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(minutes, "Invalid UTC offset, using UTC");
                Utc.fix()
            })
    }
}
