use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use docchat_core::chat::ChatMessage;
use docchat_core::observable::Subscription;
use tokio_util::sync::CancellationToken;

/// Cancellation scope for in-flight chat requests.
///
/// Each request takes a child of the current token; `cancel_all` cancels the
/// current token and installs a fresh one for later requests. Transcript
/// subscribers are counted so teardown cancels only when the last one leaves.
#[derive(Debug, Default)]
pub(crate) struct InflightRequests {
    current: Mutex<CancellationToken>,
    subscribers: AtomicUsize,
}

impl InflightRequests {
    pub(crate) fn token(&self) -> CancellationToken {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .child_token()
    }

    pub(crate) fn cancel_all(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
    }

    fn attach(&self) {
        self.subscribers.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns true when the last subscriber detached.
    fn detach(&self) -> bool {
        self.subscribers.fetch_sub(1, Ordering::SeqCst) == 1
    }
}

/// A view's subscription to a chat transcript.
///
/// When the last subscription of a transcript is dropped, any message request
/// still in flight is cancelled, so a closed view never receives a late answer.
pub struct MessageSubscription {
    inner: Subscription<Vec<ChatMessage>>,
    inflight: Arc<InflightRequests>,
}

impl MessageSubscription {
    pub(crate) fn new(
        inner: Subscription<Vec<ChatMessage>>,
        inflight: Arc<InflightRequests>,
    ) -> Self {
        inflight.attach();
        Self { inner, inflight }
    }

    pub fn current(&self) -> Vec<ChatMessage> {
        self.inner.current()
    }

    /// Waits for the next transcript; the first call replays the current one.
    pub async fn next(&mut self) -> Option<Vec<ChatMessage>> {
        self.inner.next().await
    }

    pub fn try_next(&mut self) -> Option<Vec<ChatMessage>> {
        self.inner.try_next()
    }
}

impl Drop for MessageSubscription {
    fn drop(&mut self) {
        if self.inflight.detach() {
            tracing::debug!("[Chat] Last transcript subscriber dropped, cancelling in-flight sends");
            self.inflight.cancel_all();
        }
    }
}
