//! CategorySessionManager - lifecycle of the single active category chat.
//!
//! ```text
//! Idle --select_category--> Starting --ok--> Active --clear--> Idle
//!                               |
//!                               +--err--> Idle
//! ```
//!
//! Selecting while not Idle clears first. Every transition bumps a generation
//! counter; completions carrying an older generation are discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use docchat_core::chat::ChatMessage;
use docchat_core::error::{DocChatError, Result};
use docchat_core::gateway::RemoteGateway;
use docchat_core::observable::{Observable, Subscription};
use tokio::sync::broadcast;

use super::SendOutcome;
use super::inflight::{InflightRequests, MessageSubscription};

pub const CATEGORY_ERROR_REPLY: &str =
    "Sorry, I encountered an error trying to get a response. Please try again.";

const TRANSITION_CAPACITY: usize = 64;

/// The assistant message that opens a freshly started session.
pub fn welcome_message(category_id: &str) -> ChatMessage {
    ChatMessage::assistant(format!(
        "Session started for folder: {category_id}. You can now ask questions about its content."
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Starting {
        category_id: String,
    },
    Active {
        category_id: String,
        session_id: String,
    },
}

impl SessionPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Starting { category_id } | Self::Active { category_id, .. } => Some(category_id),
        }
    }
}

/// Emitted once per state change, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    Starting {
        category_id: String,
    },
    Activated {
        category_id: String,
        session_id: String,
    },
    StartFailed {
        category_id: String,
        error: DocChatError,
    },
    Cleared {
        category_id: String,
    },
}

/// Owns the category chat session: at most one is Starting or Active.
pub struct CategorySessionManager {
    gateway: Arc<dyn RemoteGateway>,
    phase: Observable<SessionPhase>,
    messages: Observable<Vec<ChatMessage>>,
    transitions: broadcast::Sender<SessionTransition>,
    generation: AtomicU64,
    inflight: Arc<InflightRequests>,
}

impl CategorySessionManager {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            gateway,
            phase: Observable::new(SessionPhase::Idle),
            messages: Observable::new(Vec::new()),
            transitions,
            generation: AtomicU64::new(0),
            inflight: Arc::new(InflightRequests::default()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase.get()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.get()
    }

    pub fn subscribe_phase(&self) -> Subscription<SessionPhase> {
        self.phase.subscribe()
    }

    /// Subscribes to the transcript. Dropping the last live subscription
    /// cancels any in-flight `send_message`.
    pub fn subscribe_messages(&self) -> MessageSubscription {
        MessageSubscription::new(self.messages.subscribe(), self.inflight.clone())
    }

    pub fn subscribe_transitions(&self) -> broadcast::Receiver<SessionTransition> {
        self.transitions.subscribe()
    }

    /// Starts a backend session for `category_id` and returns its id.
    ///
    /// A session that is Starting or Active is cleared first. If the session
    /// is cleared or re-selected while the start request is in flight, the
    /// late result is dropped and `Cancelled` is returned.
    pub async fn select_category(&self, category_id: &str) -> Result<String> {
        let category_id = category_id.trim();
        if category_id.is_empty() {
            return Err(DocChatError::validation("Category id must not be blank"));
        }

        self.clear();

        let mut generation = 0;
        self.phase.update(|phase| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *phase = SessionPhase::Starting {
                category_id: category_id.to_string(),
            };
        });
        tracing::debug!("[SessionManager] Starting session for '{}'", category_id);
        self.emit(SessionTransition::Starting {
            category_id: category_id.to_string(),
        });

        match self.gateway.start_chat_session(category_id).await {
            Ok(started) => {
                let applied = self.phase.update_if(|phase| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    *phase = SessionPhase::Active {
                        category_id: category_id.to_string(),
                        session_id: started.session_id.clone(),
                    };
                    true
                });
                if !applied {
                    tracing::debug!(
                        "[SessionManager] Discarding stale session start for '{}'",
                        category_id
                    );
                    return Err(DocChatError::Cancelled);
                }

                self.messages.publish(vec![welcome_message(category_id)]);
                tracing::info!(
                    "[SessionManager] Session '{}' active for '{}'",
                    started.session_id,
                    category_id
                );
                self.emit(SessionTransition::Activated {
                    category_id: category_id.to_string(),
                    session_id: started.session_id.clone(),
                });
                Ok(started.session_id)
            }
            Err(err) => {
                let applied = self.phase.update_if(|phase| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    self.generation.fetch_add(1, Ordering::SeqCst);
                    *phase = SessionPhase::Idle;
                    true
                });
                if !applied {
                    tracing::debug!(
                        "[SessionManager] Discarding stale start failure for '{}': {}",
                        category_id,
                        err
                    );
                    return Err(DocChatError::Cancelled);
                }
                tracing::debug!(
                    "[SessionManager] Session start for '{}' failed: {}",
                    category_id,
                    err
                );
                self.emit(SessionTransition::StartFailed {
                    category_id: category_id.to_string(),
                    error: err.clone(),
                });
                Err(err)
            }
        }
    }

    /// Sends a question in the active session.
    ///
    /// The user message is appended before the request goes out. A backend
    /// failure appends an error notice and returns `SendOutcome::Failed`; the
    /// session stays Active.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DocChatError::validation("Message must not be blank"));
        }

        let (session_id, generation) = self.phase.with(|phase| match phase {
            SessionPhase::Active { session_id, .. } => Some((
                session_id.clone(),
                self.generation.load(Ordering::SeqCst),
            )),
            _ => None,
        })
        .ok_or_else(|| DocChatError::invalid_state("No active chat session"))?;

        if !self.append(generation, ChatMessage::user(text)) {
            return Err(DocChatError::Cancelled);
        }
        let token = self.inflight.token();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("[SessionManager] Send cancelled in session '{}'", session_id);
                return Err(DocChatError::Cancelled);
            }
            result = self.gateway.send_chat_message(&session_id, text) => result,
        };

        let outcome = match result {
            Ok(answer) => SendOutcome::Answered(answer.into_message()),
            Err(error) => {
                tracing::debug!(
                    "[SessionManager] Send failed in session '{}': {}",
                    session_id,
                    error
                );
                SendOutcome::Failed {
                    notice: ChatMessage::assistant(CATEGORY_ERROR_REPLY),
                    error,
                }
            }
        };

        if !self.append(generation, outcome.reply().clone()) {
            tracing::debug!(
                "[SessionManager] Dropping reply for ended session '{}'",
                session_id
            );
            return Err(DocChatError::Cancelled);
        }
        Ok(outcome)
    }

    /// Ends the current session locally. Server-side history is kept.
    ///
    /// No-op when Idle. Cancels in-flight sends.
    pub fn clear(&self) {
        let mut cleared = None;
        self.phase.update_if(|phase| {
            let Some(category_id) = phase.category_id() else {
                return false;
            };
            cleared = Some(category_id.to_string());
            self.generation.fetch_add(1, Ordering::SeqCst);
            *phase = SessionPhase::Idle;
            true
        });

        let Some(category_id) = cleared else {
            return;
        };
        self.inflight.cancel_all();
        self.messages.publish(Vec::new());
        tracing::debug!("[SessionManager] Cleared session for '{}'", category_id);
        self.emit(SessionTransition::Cleared { category_id });
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Appends to the transcript unless the session it belongs to has ended.
    fn append(&self, generation: u64, message: ChatMessage) -> bool {
        self.messages.update_if(|messages| {
            if !self.is_current(generation) {
                return false;
            }
            messages.push(message);
            true
        })
    }

    fn emit(&self, transition: SessionTransition) {
        // No receivers is fine.
        let _ = self.transitions.send(transition);
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
