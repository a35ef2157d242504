//! Client configuration loading.
//!
//! Loads `ClientConfig` from `~/.config/docchat/config.toml`, then applies
//! environment overrides:
//!
//! - `DOCCHAT_BASE_URL`
//! - `DOCCHAT_TIMEOUT_SECS`
//! - `DOCCHAT_STORAGE_DIR`

use std::fs;
use std::path::{Path, PathBuf};

use docchat_core::config::ClientConfig;
use docchat_core::error::{DocChatError, Result};

use crate::paths::DocChatPaths;

pub const ENV_BASE_URL: &str = "DOCCHAT_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DOCCHAT_TIMEOUT_SECS";
pub const ENV_STORAGE_DIR: &str = "DOCCHAT_STORAGE_DIR";

/// Reads the client configuration file and environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Loader for the platform config file.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: DocChatPaths::config_file()?,
        })
    }

    /// Loader for an explicit config file (used by tests and `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file (defaults if missing) and applies environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Loads only the file. A missing file yields the defaults.
    pub fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigLoader] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            DocChatError::config(format!(
                "Failed to read configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            DocChatError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Applies overrides looked up through `lookup` (normally the process environment).
pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.base_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.request_timeout_secs = raw.trim().parse().map_err(|_| {
            DocChatError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))
        })?;
    }

    if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
        config.storage_dir = Some(PathBuf::from(dir));
    }

    Ok(())
}
