//! Chat message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a chat message.
///
/// The backend history log calls the assistant `ai`; both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

/// Where in the category's documents an assistant answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSource {
    pub document_id: String,
    pub document_name: String,
    /// 1-based page number.
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
}

impl ChatSource {
    /// Builds a source pointing at `page` of `document`. Pages below 1 are clamped to 1.
    pub fn new(document: impl Into<String>, page: i64) -> Self {
        let document = document.into();
        Self {
            document_id: document.clone(),
            document_name: document,
            page_number: u32::try_from(page.max(1)).unwrap_or(u32::MAX),
            matched_text: None,
        }
    }

    pub fn with_matched_text(mut self, text: impl Into<String>) -> Self {
        self.matched_text = Some(text.into());
        self
    }
}

/// A single message in a chat transcript.
///
/// Messages are immutable once appended; transcript order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ChatSource>,
}

impl ChatMessage {
    pub fn new(sender: ChatSender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
            source: None,
        }
    }

    /// A user message stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatSender::User, text, Utc::now())
    }

    /// An assistant message stamped now.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatSender::Assistant, text, Utc::now())
    }

    pub fn with_source(mut self, source: Option<ChatSource>) -> Self {
        self.source = source;
        self
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == ChatSender::User
    }
}
