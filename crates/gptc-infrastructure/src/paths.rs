//! Unified path management for gptc files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/gptc/              # Config directory
//! ├── config.toml              # Optional settings ([session], [cli], [web])
//! └── logs/                    # Application logs
//!     └── gptc.log.YYYY-MM-DD
//!
//! ~/.gpt_history               # Interactive input history
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Well-known locations, all rooted at the user's home directory.
pub struct GptcPaths;

impl GptcPaths {
    fn home_dir() -> Result<PathBuf, PathError> {
        dirs::home_dir().ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the gptc configuration directory (`~/.config/gptc/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Ok(Self::home_dir()?.join(".config").join("gptc"))
    }

    /// Returns the path to the optional settings file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Returns the default readline history file (`~/.gpt_history`).
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::home_dir()?.join(".gpt_history"))
    }
}
