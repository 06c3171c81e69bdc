//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/pydebug/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/pydebug/` (~/.config/pydebug/)
//! - State/Logs: `$XDG_STATE_HOME/pydebug/` (~/.local/state/pydebug/)
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [[path_mappings]]
//! remote = "/srv/app"
//! local = "/home/me/src/app"
//! ```

use crate::error::{Error, Result};
use crate::position::PathMappingConverter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote-to-local path rewrites applied to frame positions
    #[serde(default)]
    pub path_mappings: Vec<PathMapping>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// A directory on the debuggee's machine and where it lives locally
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub remote: String,
    pub local: String,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        for mapping in &self.path_mappings {
            if mapping.remote.is_empty() {
                return Err(Error::Config(format!(
                    "path_mappings: remote prefix for {:?} is empty",
                    mapping.local
                )));
            }
        }
        Ok(())
    }

    /// Position converter honoring the configured path mappings
    pub fn position_converter(&self) -> PathMappingConverter {
        PathMappingConverter::new(self.path_mappings.clone())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/pydebug/config.toml` (~/.config/pydebug/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("pydebug").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/pydebug/` (~/.local/state/pydebug/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("pydebug")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/pydebug/pydebug.log` (~/.local/state/pydebug/pydebug.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("pydebug.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PositionConverter;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
        assert!(config.path_mappings.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[logging]
level = "debug"

[[path_mappings]]
remote = "/srv/app"
local = "/home/dev/app"

[[path_mappings]]
remote = "/usr/lib/python3.12"
local = "/opt/py/lib"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.path_mappings.len(), 2);
        assert_eq!(
            config.path_mappings[0],
            PathMapping {
                remote: "/srv/app".to_string(),
                local: "/home/dev/app".to_string()
            }
        );

        let converter = config.position_converter();
        assert_eq!(
            converter.to_position("/srv/app/main.py", 1).file,
            "/home/dev/app/main.py"
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"trace\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_load_from_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load_from(&missing), Err(Error::Config(_))));

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(&invalid, "[logging\n").unwrap();
        assert!(matches!(Config::load_from(&invalid), Err(Error::Config(_))));

        let empty_remote = dir.path().join("empty_remote.toml");
        std::fs::write(
            &empty_remote,
            "[[path_mappings]]\nremote = \"\"\nlocal = \"/x\"\n",
        )
        .unwrap();
        assert!(matches!(
            Config::load_from(&empty_remote),
            Err(Error::Config(_))
        ));
    }
}
