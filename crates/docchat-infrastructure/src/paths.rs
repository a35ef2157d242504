//! Unified path management for docchat files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docchat/           # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/docchat/      # Data directory
//! └── state/                   # Persisted snapshots
//!     └── chat_app_state.json
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "docchat";

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

impl From<PathError> for docchat_core::DocChatError {
    fn from(err: PathError) -> Self {
        docchat_core::DocChatError::config(err.to_string())
    }
}

/// Platform directories for docchat.
pub struct DocChatPaths;

impl DocChatPaths {
    /// Returns the docchat configuration directory (e.g. `~/.config/docchat/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the docchat data directory (e.g. `~/.local/share/docchat/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the client configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory for persisted snapshots.
    pub fn state_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("state"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_namespaced() {
        if let Ok(file) = DocChatPaths::config_file() {
            assert!(file.ends_with("docchat/config.toml"));
        }
        if let Ok(dir) = DocChatPaths::state_dir() {
            assert!(dir.ends_with("docchat/state"));
        }
    }
}
