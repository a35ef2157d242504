use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// A grouped sequence of messages about one category.
///
/// `start_time` equals the first message's timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Wraps an ordered, non-empty transcript. Returns `None` for an empty one,
    /// since a session without messages has no start time.
    pub fn from_messages(id: impl Into<String>, messages: Vec<ChatMessage>) -> Option<Self> {
        let start_time = messages.first()?.timestamp;
        Some(Self {
            id: id.into(),
            start_time,
            messages,
        })
    }
}
