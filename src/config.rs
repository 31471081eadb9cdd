//! Configuration Module
//!
//! Render defaults stored in `~/.config/action-params/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (`--escape`, `--strict`)
//! 2. Environment variables (`ACTION_PARAMS_ESCAPE`, `ACTION_PARAMS_MISSING`)
//! 3. Config file
//! 4. Defaults (no escaping, missing references render empty)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ParamsError, Result};
use crate::template::{EscapePolicy, MissingPolicy, RenderOptions};
use crate::util::constants::{ENV_ESCAPE, ENV_MISSING};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParamsConfig {
    #[serde(default)]
    pub render: RenderDefaults,
}

/// Render settings; unset fields fall back to the built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RenderDefaults {
    pub escape: Option<EscapePolicy>,
    pub missing: Option<MissingPolicy>,
}

impl ParamsConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/action-params/` on Unix, `%APPDATA%/action-params/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("action-params")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ParamsError::ConfigError {
            reason: format!("Failed to read config file: {}", e),
        })?;

        toml::from_str(&content).map_err(|e| ParamsError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to file, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ParamsError::ConfigError {
                    reason: format!("Failed to create config directory: {}", e),
                })?;
            }
        }

        let content = toml::to_string_pretty(self).map_err(|e| ParamsError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| ParamsError::ConfigError {
            reason: format!("Failed to write config file: {}", e),
        })?;

        Ok(())
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    /// Empty values are ignored; invalid values are logged and ignored.
    pub fn with_env(mut self) -> Self {
        if let Some(escape) = env_override::<EscapePolicy>(ENV_ESCAPE) {
            self.render.escape = Some(escape);
        }
        if let Some(missing) = env_override::<MissingPolicy>(ENV_MISSING) {
            self.render.missing = Some(missing);
        }
        self
    }

    /// Effective render options
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            escape: self.render.escape.unwrap_or_default(),
            missing: self.render.missing.unwrap_or_default(),
        }
    }
}

fn env_override<T>(var: &str) -> Option<T>
where
    T: std::str::FromStr<Err = ParamsError>,
{
    let raw = std::env::var(var).ok()?;
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var, error = %e, "ignoring invalid environment override");
            None
        }
    }
}
