//! Application layer for DocChat.
//!
//! The synchronization engine: the category/document cache mirrored to the
//! local snapshot, the category chat session state machine, the stateless
//! general assistant, and history retrieval.

pub mod category_store;
pub mod session;

#[cfg(test)]
mod test_support;

pub use category_store::{CategoryStore, LoadSource};
pub use session::{
    AssistantChat, CategorySessionManager, HistoryService, MessageSubscription, SendOutcome,
    SessionPhase, SessionTransition,
};
