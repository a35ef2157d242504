//! Hand-written collaborators for engine tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use docchat_core::chat::HistoryRecord;
use docchat_core::error::{DocChatError, Result};
use docchat_core::gateway::{
    AnswerSource, ChatAnswer, DocumentUpload, RemoteGateway, StartedSession, UploadReceipt,
};
use docchat_core::persistence::PersistenceAdapter;
use tokio::sync::Notify;

/// Scriptable `RemoteGateway`.
///
/// - every call is recorded by operation name
/// - `fail(op)` makes that operation reject with a network error
/// - `hold(op)` parks the next calls of that operation until the returned
///   `Notify` is signalled, so tests can observe in-flight state
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<String>>,
    categories: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
    answers: Mutex<VecDeque<ChatAnswer>>,
    history: Mutex<Vec<HistoryRecord>>,
    session_counter: Mutex<u32>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(names: &[&str]) -> Self {
        let gateway = Self::default();
        *gateway.categories.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
        gateway
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn hold(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(op, gate.clone());
        gate
    }

    pub fn release_all(&self) {
        self.gates.lock().unwrap().clear();
    }

    pub fn push_answer(&self, answer: &str, sources: Vec<AnswerSource>) {
        self.answers.lock().unwrap().push_back(ChatAnswer {
            answer: answer.to_string(),
            sources,
        });
    }

    pub fn set_history(&self, records: Vec<HistoryRecord>) {
        *self.history.lock().unwrap() = records;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }

    async fn call(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op.to_string());
        let gate = self.gates.lock().unwrap().get(op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(DocChatError::network(op, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteGateway for MockGateway {
    async fn list_categories(&self) -> Result<Vec<String>> {
        self.call("list_categories").await?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_category(&self, name: &str) -> Result<()> {
        self.call("create_category").await?;
        self.categories.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn delete_category(&self, category_id: &str) -> Result<()> {
        self.call("delete_category").await?;
        self.categories.lock().unwrap().retain(|c| c != category_id);
        Ok(())
    }

    async fn upload_document(
        &self,
        category_id: &str,
        upload: DocumentUpload,
    ) -> Result<UploadReceipt> {
        self.call("upload_document").await?;
        Ok(UploadReceipt {
            message: format!("stored {} in {}", upload.file_name, category_id),
        })
    }

    async fn delete_document(&self, _category_id: &str, _document_id: &str) -> Result<()> {
        self.call("delete_document").await
    }

    async fn start_chat_session(&self, category_id: &str) -> Result<StartedSession> {
        self.call("start_chat_session").await?;
        let mut counter = self.session_counter.lock().unwrap();
        *counter += 1;
        Ok(StartedSession {
            message: format!("started {category_id}"),
            session_id: format!("session-{}", *counter),
        })
    }

    async fn send_chat_message(&self, _session_id: &str, question: &str) -> Result<ChatAnswer> {
        self.call("send_chat_message").await?;
        let scripted = self.answers.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| ChatAnswer {
            answer: format!("answer to {question}"),
            sources: Vec::new(),
        }))
    }

    async fn ask_assistant(&self, message: &str) -> Result<String> {
        self.call("ask_assistant").await?;
        Ok(format!("assistant says: {message}"))
    }

    async fn chat_history(&self, _category_id: &str) -> Result<Vec<HistoryRecord>> {
        self.call("chat_history").await?;
        Ok(self.history.lock().unwrap().clone())
    }

    async fn delete_chat_history(&self, _category_id: &str) -> Result<()> {
        self.call("delete_chat_history").await?;
        self.history.lock().unwrap().clear();
        Ok(())
    }
}

/// `PersistenceAdapter` whose reads and/or writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
    writes: Mutex<usize>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl PersistenceAdapter for FlakyStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(DocChatError::persistence("store unavailable"));
        }
        Ok(self.raw(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DocChatError::persistence("disk full"));
        }
        *self.writes.lock().unwrap() += 1;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
