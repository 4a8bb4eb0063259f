//! Assistant configuration management and settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ItemKind;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load/save errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Tunable settings for the assistant service.
///
/// The day-window ceilings (30 days mail, 60 days calendar) are domain
/// constants on [`ItemKind`], not configuration; these knobs only cover the
/// defaults applied when a tool call leaves a parameter out, and the
/// projection's preview budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Day window used when a mail listing names no day-count
    pub default_mail_days: i64,

    /// Day window used when a calendar listing names no day-count
    pub default_calendar_days: i64,

    /// Character budget for body previews in summaries
    pub preview_chars: usize,

    /// Result cap applied when a tool call names none; `None` means
    /// unlimited
    pub default_limit: Option<usize>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_mail_days: 7,
            default_calendar_days: 14,
            preview_chars: 200,
            default_limit: None,
        }
    }
}

impl AssistantConfig {
    /// Default day-count for a kind, used when the caller supplies none.
    pub fn default_days(&self, kind: ItemKind) -> i64 {
        match kind {
            ItemKind::Mail => self.default_mail_days,
            ItemKind::Appointment => self.default_calendar_days,
        }
    }

    /// Load configuration from a toml file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write configuration to a toml file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Conventional config location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deskmail").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tool_defaults() {
        let config = AssistantConfig::default();

        assert_eq!(config.default_days(ItemKind::Mail), 7);
        assert_eq!(config.default_days(ItemKind::Appointment), 14);
        assert_eq!(config.preview_chars, 200);
        assert_eq!(config.default_limit, None);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AssistantConfig::default();
        config.default_mail_days = 3;
        config.default_limit = Some(25);
        config.save(&path).unwrap();

        let loaded = AssistantConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let config = AssistantConfig::load_or_default(&path).unwrap();
        assert_eq!(config, AssistantConfig::default());
    }

    #[test]
    fn test_partial_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_mail_days = 3\n").unwrap();

        assert!(matches!(
            AssistantConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
