//! Substituter configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the code to convert these
//! structs to and from TOML. `#[serde(default)]` fills missing fields from
//! `Default::default()`, so an empty or partial config file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the rule store inside the home directory.
pub const DEFAULT_RULES_FILE: &str = ".evergreen-substituter";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule file location (defaults to `~/.evergreen-substituter`)
    pub rules_path: Option<PathBuf>,

    /// Dialog used to teach new rules
    pub dialog: DialogConfig,
}

impl Config {
    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from `path` if given, otherwise from the default location.
    ///
    /// Only a missing file at the default location falls back to defaults;
    /// an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("substituter").join("config.toml"))
    }

    /// Resolves the rule file location.
    pub fn rules_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.rules_path {
            Some(path) => Ok(path.clone()),
            None => {
                let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
                Ok(home.join(DEFAULT_RULES_FILE))
            }
        }
    }
}

/// Settings for the external dialog that collects new rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Dialog program (must accept `yad`-style form arguments)
    pub program: String,

    /// Window title
    pub title: String,

    /// Window width in pixels
    pub width: u32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            program: "yad".to_string(),
            title: "Add an auto-complete".to_string(),
            width: 600,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
