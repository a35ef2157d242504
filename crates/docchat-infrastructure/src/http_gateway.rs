//! HttpRemoteGateway - `RemoteGateway` over the backend's HTTP/JSON API.
//!
//! One request per call, no retries. Non-success statuses become
//! `DocChatError::Network` carrying the status and the backend's error text.

use std::time::Duration;

use async_trait::async_trait;
use docchat_core::chat::{HistoryRecord, decode_history_rows};
use docchat_core::config::ClientConfig;
use docchat_core::error::{DocChatError, Result};
use docchat_core::gateway::{
    ChatAnswer, DocumentUpload, RemoteGateway, StartedSession, UploadReceipt,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_UPLOAD_MIME: &str = "application/pdf";
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CreateCategoryRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct StartSessionRequest<'a> {
    category: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    question: &'a str,
}

#[derive(Debug, Serialize)]
struct AssistantRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssistantResponse {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Gateway implementation that talks to the backend over HTTP.
#[derive(Clone)]
pub struct HttpRemoteGateway {
    client: Client,
    base_url: String,
}

impl HttpRemoteGateway {
    /// Creates a gateway for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocChatError::config(format!("Failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.normalized_base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| map_transport_error(operation, err))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::debug!(
                "[HttpRemoteGateway] {} failed with {}: {}",
                operation,
                status,
                body_text
            );
            return Err(DocChatError::http_status(
                operation,
                status.as_u16(),
                extract_error_message(&body_text, status.canonical_reason()),
            ));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(operation, request).await?;
        response.json::<T>().await.map_err(|err| {
            DocChatError::network(operation, format!("Failed to parse response: {err}"))
        })
    }
}

fn map_transport_error(operation: &str, err: reqwest::Error) -> DocChatError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        format!("request failed: {err}")
    };
    match err.status() {
        Some(status) => DocChatError::http_status(operation, status.as_u16(), message),
        None => DocChatError::network(operation, message),
    }
}

/// Prefers the backend's `{"error": ...}` message, else the trimmed body text.
fn extract_error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("request rejected").to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

fn upload_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_UPLOAD_MIME)
        .to_string()
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn list_categories(&self) -> Result<Vec<String>> {
        let body: CategoriesResponse = self
            .send_json("list categories", self.client.get(self.url(&["categories"])))
            .await?;
        Ok(body.categories)
    }

    async fn create_category(&self, name: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url(&["categories"]))
            .json(&CreateCategoryRequest { name });
        self.send("create category", request).await?;
        Ok(())
    }

    async fn delete_category(&self, category_id: &str) -> Result<()> {
        let request = self.client.delete(self.url(&["categories", category_id]));
        self.send("delete category", request).await?;
        Ok(())
    }

    async fn upload_document(
        &self,
        category_id: &str,
        upload: DocumentUpload,
    ) -> Result<UploadReceipt> {
        let mime = upload_mime(&upload.file_name);
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&mime)
            .map_err(|e| DocChatError::validation(format!("Invalid upload MIME type: {e}")))?;
        let form = Form::new()
            .part("files", part)
            .text("category", category_id.to_string());

        let request = self.client.post(self.url(&["upload"])).multipart(form);
        self.send_json("upload document", request).await
    }

    async fn delete_document(&self, category_id: &str, document_id: &str) -> Result<()> {
        let request = self.client.delete(self.url(&[
            "categories",
            category_id,
            "documents",
            document_id,
        ]));
        self.send("delete document", request).await?;
        Ok(())
    }

    async fn start_chat_session(&self, category_id: &str) -> Result<StartedSession> {
        let request = self
            .client
            .post(self.url(&["chat", "start"]))
            .json(&StartSessionRequest {
                category: category_id,
            });
        self.send_json("start chat session", request).await
    }

    async fn send_chat_message(&self, session_id: &str, question: &str) -> Result<ChatAnswer> {
        let request = self
            .client
            .post(self.url(&["chat"]))
            .json(&ChatRequest {
                session_id,
                question,
            });
        self.send_json("send chat message", request).await
    }

    async fn ask_assistant(&self, message: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url(&["ai-solution"]))
            .json(&AssistantRequest { message });
        let body: AssistantResponse = self.send_json("ask assistant", request).await?;
        Ok(body.answer)
    }

    async fn chat_history(&self, category_id: &str) -> Result<Vec<HistoryRecord>> {
        let request = self
            .client
            .get(self.url(&["chat", "history", category_id]));
        let rows: Vec<serde_json::Value> = self.send_json("get chat history", request).await?;
        Ok(decode_history_rows(rows))
    }

    async fn delete_chat_history(&self, category_id: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&["chat", "history", category_id]));
        self.send("delete chat history", request).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_gateway_test.rs"]
mod tests;
