//! Chat sessions: the category session state machine, the general assistant,
//! and history access.

mod assistant;
mod history;
mod inflight;
mod manager;

pub use assistant::{ASSISTANT_ERROR_REPLY, ASSISTANT_GREETING, AssistantChat};
pub use history::HistoryService;
pub use inflight::MessageSubscription;
pub use manager::{
    CATEGORY_ERROR_REPLY, CategorySessionManager, SessionPhase, SessionTransition,
    welcome_message,
};

use docchat_core::chat::ChatMessage;
use docchat_core::error::DocChatError;

/// Result of a message that reached the backend (or failed to).
///
/// A failed send does not end the session: the notice has already been
/// appended to the transcript and the error is handed back for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Answered(ChatMessage),
    Failed {
        notice: ChatMessage,
        error: DocChatError,
    },
}

impl SendOutcome {
    /// The assistant message that was appended, answer or notice.
    pub fn reply(&self) -> &ChatMessage {
        match self {
            Self::Answered(message) => message,
            Self::Failed { notice, .. } => notice,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }
}
