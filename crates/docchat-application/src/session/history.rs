//! Read and delete a category's backend chat history.

use std::sync::Arc;

use docchat_core::chat::{ChatMessage, ChatSession, reconcile};
use docchat_core::error::{DocChatError, Result};
use docchat_core::gateway::RemoteGateway;

pub struct HistoryService {
    gateway: Arc<dyn RemoteGateway>,
}

impl HistoryService {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    /// Fetches and reconciles the history of `category_id`.
    ///
    /// A failed fetch is logged and yields no sessions.
    pub async fn sessions(&self, category_id: &str) -> Result<Vec<ChatSession>> {
        require_id(category_id)?;
        match self.gateway.chat_history(category_id).await {
            Ok(records) => {
                tracing::debug!(
                    "[HistoryService] {} history records for '{}'",
                    records.len(),
                    category_id
                );
                Ok(reconcile(category_id, &records))
            }
            Err(err) => {
                tracing::warn!(
                    "[HistoryService] Failed to fetch history for '{}': {}",
                    category_id,
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    /// Like [`HistoryService::sessions`], but never empty: a category with no
    /// history gets one session holding a placeholder message.
    pub async fn sessions_or_welcome(&self, category_id: &str) -> Result<Vec<ChatSession>> {
        let sessions = self.sessions(category_id).await?;
        if !sessions.is_empty() {
            return Ok(sessions);
        }
        let welcome = ChatMessage::assistant(format!(
            "No chat history for {category_id} yet. Start a session to ask questions about its content."
        ));
        Ok(ChatSession::from_messages(category_id, vec![welcome])
            .into_iter()
            .collect())
    }

    /// Deletes all server-side history of `category_id`.
    pub async fn delete(&self, category_id: &str) -> Result<()> {
        require_id(category_id)?;
        self.gateway.delete_chat_history(category_id).await?;
        tracing::info!("[HistoryService] Deleted history for '{}'", category_id);
        Ok(())
    }
}

fn require_id(category_id: &str) -> Result<()> {
    if category_id.trim().is_empty() {
        return Err(DocChatError::validation("Category id must not be blank"));
    }
    Ok(())
}
