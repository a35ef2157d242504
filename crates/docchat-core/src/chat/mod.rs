//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: transcript entries (`ChatMessage`, `ChatSender`, `ChatSource`)
//! - `session`: grouped transcripts (`ChatSession`)
//! - `history`: backend history rows and the `reconcile` transform

mod history;
mod message;
mod session;

pub use history::{decode_history_rows, parse_backend_timestamp, reconcile, HistoryRecord};
pub use message::{ChatMessage, ChatSender, ChatSource};
pub use session::ChatSession;
