//! Local snapshot store trait.
//!
//! Defines the key/value boundary the category cache is mirrored through.

use async_trait::async_trait;

use crate::error::{DocChatError, Result};

/// A durable key/value store holding serialized snapshots.
///
/// The adapter stores opaque strings; serialization of the values is the
/// caller's concern. Only the category store writes through it.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: value found
    /// - `Ok(None)`: nothing stored under `key`
    /// - `Err(_)`: the store could not be read
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key` (no-op if absent).
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Checks that a snapshot key is usable as a file stem on every platform.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DocChatError::validation(format!(
            "invalid storage key '{key}': use letters, digits, '_' or '-'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("chat_app_state").is_ok());
        assert!(validate_key("state-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a b").is_err());
    }
}
