//! Configuration file support for Krep Streaks.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/krep-streak/config.toml`.

use crate::adherence::DEFAULT_WINDOW_DAYS;
use crate::{Error, Result, StreakRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest rolling grace window accepted from config (one year)
pub const MAX_GRACE_HOURS: i64 = 24 * 365;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub streak: StreakRules,

    #[serde(default)]
    pub adherence: AdherenceConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Adherence window configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdherenceConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for AdherenceConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("krep-streak")
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the engine cannot use
    pub fn validate(&self) -> Result<()> {
        if self.streak.max_neutral_days > 7 {
            return Err(Error::Config(format!(
                "streak.max_neutral_days must be at most 7, got {}",
                self.streak.max_neutral_days
            )));
        }
        if !(0..=MAX_GRACE_HOURS).contains(&self.streak.grace_hours) {
            return Err(Error::Config(format!(
                "streak.grace_hours must be between 0 and {}, got {}",
                MAX_GRACE_HOURS, self.streak.grace_hours
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("krep-streak").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
