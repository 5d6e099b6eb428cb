//! Configuration loading and management for the scraper.
//!
//! Loads settings from `tradewizard.toml` with environment variable overrides.
//! Every setting has a default, so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "tradewizard.toml";

/// Desktop browser identity; bare client user agents are often blocked.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("{name} must be {expected}, got {value}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Fetch and extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Upper bound for the whole HTTP exchange, in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with the request
    pub user_agent: String,
    /// Site-specific product containers tried after the built-in ones
    pub extra_product_selectors: Vec<String>,
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_product_selectors: Vec::new(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
}

impl Config {
    /// Load configuration from the default location (tradewizard.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Override settings from environment variables
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TRADEWIZARD_TIMEOUT_SECS") {
            self.scraper.timeout_secs =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "TRADEWIZARD_TIMEOUT_SECS",
                    value,
                })?;
        }
        if let Some(agent) = lookup("TRADEWIZARD_USER_AGENT") {
            if !agent.trim().is_empty() {
                self.scraper.user_agent = agent;
            }
        }
        Ok(())
    }

    /// Reject settings that would make every fetch fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs",
                value: self.scraper.timeout_secs.to_string(),
                expected: "at least 1",
            });
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("tradewizard")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_fetch_contract() {
        let config = Config::default();
        assert_eq!(config.scraper.timeout(), Duration::from_secs(15));
        assert!(config.scraper.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.scraper.extra_product_selectors.is_empty());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str("[scraper]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.scraper.timeout_secs, 5);
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("TRADEWIZARD_TIMEOUT_SECS", " 30 "),
                ("TRADEWIZARD_USER_AGENT", "TestAgent/1.0"),
            ]))
            .unwrap();
        assert_eq!(config.scraper.timeout_secs, 30);
        assert_eq!(config.scraper.user_agent, "TestAgent/1.0");
    }

    #[test]
    fn blank_user_agent_override_is_ignored() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("TRADEWIZARD_USER_AGENT", "  ")]))
            .unwrap();
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn invalid_timeout_override_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("TRADEWIZARD_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn zero_timeout_from_env_fails_validation() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("TRADEWIZARD_TIMEOUT_SECS", "0")]))
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "timeout_secs",
                ..
            }
        ));
        assert!(Config::default().validate().is_ok());
    }
}
