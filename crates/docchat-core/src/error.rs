//! Error types for the DocChat client engine.

use thiserror::Error;

/// A shared error type for the entire DocChat engine.
///
/// Variants follow the three failure families the engine distinguishes:
/// network failures (any remote call rejected), validation failures (the caller
/// asked for something that cannot be valid against current state), and
/// persistence failures (the local snapshot store is unavailable or corrupted).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocChatError {
    /// A remote call was rejected or could not be completed.
    #[error("Network error during {operation}: {message}")]
    Network {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// The caller supplied invalid input (blank name, malformed key, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found in the current client-side state.
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The operation is not allowed in the current state machine phase.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The request was abandoned because its consumer went away.
    #[error("Operation cancelled")]
    Cancelled,

    /// Local snapshot store unavailable.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error without an HTTP status.
    pub fn network(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Network error for a non-success HTTP status.
    pub fn http_status(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a network failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if the request was rejected before reaching the network.
    ///
    /// Returns true for:
    /// - `Validation` errors
    /// - `NotFound` errors (unknown ids in current state)
    /// - `InvalidState` errors (e.g. sending while no session is active)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound { .. } | Self::InvalidState(_)
        )
    }

    /// Check if this is a local store failure
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. } | Self::Serialization { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the request was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status carried by a network failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DocChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DocChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DocChatError>`.
pub type Result<T> = std::result::Result<T, DocChatError>;
