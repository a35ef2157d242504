//! Domain layer for DocChat.
//!
//! Holds the data model (categories, documents, chat messages and sessions),
//! the contracts of the two leaf collaborators (`PersistenceAdapter` and
//! `RemoteGateway`), the replay-one `Observable` used to publish state, and
//! the pure history `reconcile` transform.

pub mod category;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod observable;
pub mod persistence;

// Re-export common types
pub use error::{DocChatError, Result};
pub use observable::{Observable, Subscription};
