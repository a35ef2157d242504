//! Remote backend contract.
//!
//! The backend is the source of truth for categories, documents and chat
//! history. The gateway performs exactly one request per call and never
//! retries; any failure surfaces as an `Err`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatSource, HistoryRecord};
use crate::error::Result;

/// A file to upload into a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
}

/// Body of a successful `POST /chat/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedSession {
    #[serde(default)]
    pub message: String,
    pub session_id: String,
}

/// One entry of a chat answer's `sources` array.
///
/// The backend has shipped both a detailed object form and a bare file-name form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerSource {
    Detailed {
        source: String,
        #[serde(default = "first_page")]
        page: i64,
        #[serde(default, alias = "content")]
        text: Option<String>,
    },
    Name(String),
}

fn first_page() -> i64 {
    1
}

impl From<&AnswerSource> for ChatSource {
    fn from(source: &AnswerSource) -> Self {
        match source {
            AnswerSource::Detailed { source, page, text } => {
                let chat_source = ChatSource::new(source.clone(), *page);
                match text {
                    Some(text) => chat_source.with_matched_text(text.clone()),
                    None => chat_source,
                }
            }
            AnswerSource::Name(name) => ChatSource::new(name.clone(), 1),
        }
    }
}

/// Body of a successful `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<AnswerSource>,
}

impl ChatAnswer {
    /// Converts the answer into an assistant message citing its first source.
    pub fn into_message(self) -> ChatMessage {
        let source = self.sources.first().map(ChatSource::from);
        ChatMessage::assistant(self.answer).with_source(source)
    }
}

/// Typed request/response functions against the backend.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// `GET /categories`: names of all categories.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// `POST /categories`
    async fn create_category(&self, name: &str) -> Result<()>;

    /// `DELETE /categories/{id}`
    async fn delete_category(&self, category_id: &str) -> Result<()>;

    /// `POST /upload` (multipart `files` + `category`)
    async fn upload_document(
        &self,
        category_id: &str,
        upload: DocumentUpload,
    ) -> Result<UploadReceipt>;

    /// `DELETE /categories/{categoryId}/documents/{documentId}`
    async fn delete_document(&self, category_id: &str, document_id: &str) -> Result<()>;

    /// `POST /chat/start`: opens a server-side session scoped to a category.
    async fn start_chat_session(&self, category_id: &str) -> Result<StartedSession>;

    /// `POST /chat`: asks a question within an open session.
    async fn send_chat_message(&self, session_id: &str, question: &str) -> Result<ChatAnswer>;

    /// `POST /ai-solution`: stateless general assistant; returns the answer text.
    async fn ask_assistant(&self, message: &str) -> Result<String>;

    /// `GET /chat/history/{categoryId}`: flat, chronologically ordered log.
    async fn chat_history(&self, category_id: &str) -> Result<Vec<HistoryRecord>>;

    /// `DELETE /chat/history/{categoryId}`
    async fn delete_chat_history(&self, category_id: &str) -> Result<()>;
}
