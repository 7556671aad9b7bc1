//! Configuration loading.
//!
//! Settings live in `~/.jportal/config.toml`. The `JPORTAL_CONFIG`
//! environment variable overrides the path, and a missing file yields the
//! defaults so the tool works out of the box.

use crate::core::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::http::DEFAULT_BASE_URL;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "JPORTAL_CONFIG";

/// On-disk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Portal API root.
    pub base_url: String,
    /// Stored portal username, if any. The `JPORTAL_USERNAME` environment
    /// variable takes precedence at the CLI layer.
    pub username: Option<String>,
    /// Stored portal password, if any. Prefer `JPORTAL_PASSWORD` over
    /// keeping this on disk.
    pub password: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            password: None,
        }
    }
}

impl GlobalConfig {
    /// Resolve the config file path, honoring `JPORTAL_CONFIG`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or_else(|| PortalError::Config {
            message: "could not determine home directory".to_string(),
        })?;
        Ok(home.join(".jportal").join("config.toml"))
    }

    /// Load the config from the default location, falling back to the
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|err| PortalError::Config {
            message: format!("invalid config at {}: {err}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GlobalConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.username.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "username = \"21103042\"\n").unwrap();
        let config = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(config.username.as_deref(), Some("21103042"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();
        let err = GlobalConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, PortalError::Config { .. }));
    }
}
