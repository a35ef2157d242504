//! General-purpose assistant chat.
//!
//! No session on the backend: every question is an independent request. The
//! transcript is local only. When the last transcript subscriber goes away,
//! pending questions are cancelled and their answers are never appended.

use std::sync::Arc;

use docchat_core::chat::ChatMessage;
use docchat_core::error::{DocChatError, Result};
use docchat_core::gateway::RemoteGateway;
use docchat_core::observable::Observable;

use super::SendOutcome;
use super::inflight::{InflightRequests, MessageSubscription};

pub const ASSISTANT_GREETING: &str = "I am your general AI assistant. How can I help you today?";
pub const ASSISTANT_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub struct AssistantChat {
    gateway: Arc<dyn RemoteGateway>,
    transcript: Observable<Vec<ChatMessage>>,
    inflight: Arc<InflightRequests>,
}

impl AssistantChat {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self {
            gateway,
            transcript: Observable::new(vec![ChatMessage::assistant(ASSISTANT_GREETING)]),
            inflight: Arc::new(InflightRequests::default()),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.get()
    }

    /// Subscribes to the transcript. Dropping the last subscription cancels
    /// any question still in flight.
    pub fn subscribe(&self) -> MessageSubscription {
        MessageSubscription::new(self.transcript.subscribe(), self.inflight.clone())
    }

    /// Asks the assistant a question. Failures append an error notice.
    ///
    /// Returns `Cancelled` without appending a reply if the transcript was
    /// torn down or reset while the request was in flight.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DocChatError::validation("Message must not be blank"));
        }

        self.transcript
            .update(|messages| messages.push(ChatMessage::user(text)));
        let token = self.inflight.token();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("[AssistantChat] Request cancelled");
                return Err(DocChatError::Cancelled);
            }
            result = self.gateway.ask_assistant(text) => result,
        };

        let outcome = match result {
            Ok(answer) => SendOutcome::Answered(ChatMessage::assistant(answer)),
            Err(error) => {
                tracing::debug!("[AssistantChat] Request failed: {}", error);
                SendOutcome::Failed {
                    notice: ChatMessage::assistant(ASSISTANT_ERROR_REPLY),
                    error,
                }
            }
        };
        let reply = outcome.reply().clone();
        self.transcript.update(|messages| messages.push(reply));
        Ok(outcome)
    }

    /// Drops the transcript back to the greeting and cancels pending questions.
    pub fn reset(&self) {
        self.inflight.cancel_all();
        self.transcript
            .publish(vec![ChatMessage::assistant(ASSISTANT_GREETING)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockGateway;
    use std::time::Duration;

    fn chat() -> (AssistantChat, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::new());
        (AssistantChat::new(gateway.clone()), gateway)
    }

    #[test]
    fn test_transcript_starts_with_greeting() {
        let (chat, _) = chat();
        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].text, ASSISTANT_GREETING);
        assert!(!transcript[0].is_from_user());
    }

    #[tokio::test]
    async fn test_send_appends_question_and_answer() {
        let (chat, gateway) = chat();

        let outcome = chat.send_message("  What is a W-2? ").await.unwrap();

        assert_eq!(outcome.reply().text, "assistant says: What is a W-2?");
        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].text, "What is a W-2?");
        assert!(transcript[2].source.is_none());
        assert_eq!(gateway.count("ask_assistant"), 1);
    }

    #[tokio::test]
    async fn test_failure_appends_notice() {
        let (chat, gateway) = chat();
        gateway.fail("ask_assistant");

        let outcome = chat.send_message("hi").await.unwrap();

        assert!(!outcome.is_answered());
        assert_eq!(chat.transcript()[2].text, ASSISTANT_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_blank_is_rejected_and_reset_restores_greeting() {
        let (chat, gateway) = chat();

        assert!(chat.send_message("").await.unwrap_err().is_validation());
        assert_eq!(gateway.count("ask_assistant"), 0);

        chat.send_message("hi").await.unwrap();
        chat.reset();
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_dropping_view_cancels_pending_question() {
        let (chat, gateway) = chat();
        let chat = Arc::new(chat);
        let view = chat.subscribe();
        let gate = gateway.hold("ask_assistant");

        let task = {
            let chat = chat.clone();
            tokio::spawn(async move { chat.send_message("slow question").await })
        };
        while gateway.count("ask_assistant") == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        drop(view);
        gate.notify_one();

        assert!(task.await.unwrap().unwrap_err().is_cancelled());
        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript[1].is_from_user());
    }

    #[tokio::test]
    async fn test_reset_cancels_pending_question() {
        let (chat, gateway) = chat();
        let chat = Arc::new(chat);
        let _gate = gateway.hold("ask_assistant");

        let task = {
            let chat = chat.clone();
            tokio::spawn(async move { chat.send_message("slow question").await })
        };
        while gateway.count("ask_assistant") == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        chat.reset();

        assert!(task.await.unwrap().unwrap_err().is_cancelled());
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_subscription_replays_transcript() {
        let (chat, _) = chat();
        let mut view = chat.subscribe();
        assert_eq!(view.next().await.unwrap().len(), 1);

        chat.send_message("hi").await.unwrap();
        assert_eq!(view.current().len(), 3);
    }
}
