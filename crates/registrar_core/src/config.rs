//! TOML configuration for records tooling.
//!
//! # Responsibility
//! - Load database and logging settings from a TOML file.
//! - Fill unspecified settings with built-in defaults.
//!
//! # Invariants
//! - A loaded config always carries a supported, normalized log level.
//! - `logging.dir`, when set, is absolute.
//!
//! Example:
//!
//! ```toml
//! [database]
//! path = "/var/lib/registrar/records.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/registrar"
//! ```

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "registrar.sqlite3";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// File logging is disabled when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Reads and validates the config file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parses and validates config text.
pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = toml::from_str(text)?;
    config.logging.level = normalize_level(&config.logging.level)
        .map_err(ConfigError::Invalid)?
        .to_string();
    if let Some(dir) = &config.logging.dir {
        if !dir.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "logging.dir must be an absolute path, got `{}`",
                dir.display()
            )));
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{load_config, parse_config, AppConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn empty_text_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn level_is_normalized_and_sections_are_read() {
        let config = parse_config(
            r#"
            [database]
            path = "/srv/records.sqlite3"

            [logging]
            level = "WARNING"
            dir = "/var/log/registrar"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/srv/records.sqlite3"));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/registrar")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            parse_config("[logging]\nlevel = \"loud\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            parse_config("[logging]\ndir = \"logs\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            parse_config("[database]\nurl = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
