use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// The single key the category snapshot is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "chat_app_state";

/// Client settings, read from `config.toml` and environment overrides.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root URL, without trailing slash.
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Directory for the local snapshot; `None` uses the platform data dir.
    pub storage_dir: Option<PathBuf>,
    pub storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// The base URL with any trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
