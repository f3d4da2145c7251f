//! Settings file storage.
//!
//! Reads `~/.config/gptc/config.toml`. Every table and key is optional; a
//! missing file is the same as an empty one.
//!
//! ```toml
//! [session]
//! model = "gpt-4o"
//! temperature = 0.5
//!
//! [cli]
//! history_file = "/tmp/history"
//! code_theme = "dark"
//!
//! [web]
//! port = 8080
//! accept_truncation = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use gptc_core::{ConfigError, SessionConfig};
use serde::Deserialize;
use tracing::debug;

use crate::paths::GptcPaths;

/// Errors that can occur while loading the settings file.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<ConfigStorageError> for ConfigError {
    fn from(e: ConfigStorageError) -> Self {
        ConfigError::File(e.to_string())
    }
}

/// `[cli]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliSection {
    pub history_file: Option<PathBuf>,
    pub code_theme: Option<String>,
}

/// `[web]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Whether oversized pages are truncated and sent when nobody can be asked.
    pub accept_truncation: Option<bool>,
}

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub session: SessionConfig,
    pub cli: CliSection,
    pub web: WebSection,
}

/// Read-only access to the settings file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage for the default path (`~/.config/gptc/config.toml`).
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = GptcPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the settings, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<FileConfig, ConfigStorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file; using defaults");
            return Ok(FileConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        debug!(path = %self.path.display(), "loaded settings file");
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));

        let config = storage.load().unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_load_partial_tables() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(
            &file_path,
            r#"
[session]
model = "gpt-4o"
temperature = 0.7

[cli]
code_theme = "light"

[web]
port = 9000
accept_truncation = false
"#,
        )
        .unwrap();

        let config = ConfigStorage::with_path(file_path).load().unwrap();

        assert_eq!(config.session.model, "gpt-4o");
        assert_eq!(config.session.temperature, 0.7);
        assert_eq!(config.session.top_p, SessionConfig::default().top_p);
        assert_eq!(config.cli.code_theme.as_deref(), Some("light"));
        assert_eq!(config.cli.history_file, None);
        assert_eq!(config.web.port, Some(9000));
        assert_eq!(config.web.host, None);
        assert_eq!(config.web.accept_truncation, Some(false));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(&file_path, "[session\nmodel = ").unwrap();

        let result = ConfigStorage::with_path(file_path).load();
        assert!(matches!(result, Err(ConfigStorageError::TomlParseError(_))));

        let err: ConfigError = result.unwrap_err().into();
        assert!(matches!(err, ConfigError::File(_)));
    }
}
