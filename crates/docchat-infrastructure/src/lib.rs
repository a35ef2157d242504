//! Infrastructure adapters for DocChat.
//!
//! Concrete implementations of the core collaborator traits:
//! file-backed and in-memory snapshot stores, config-file loading, platform
//! paths, and the HTTP gateway to the backend.

pub mod config_loader;
pub mod http_gateway;
pub mod paths;
pub mod storage;

pub use crate::config_loader::ConfigLoader;
pub use crate::http_gateway::HttpRemoteGateway;
pub use crate::paths::DocChatPaths;
pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};
