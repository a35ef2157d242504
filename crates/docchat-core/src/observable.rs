//! Replay-one publish/subscribe primitive.
//!
//! An `Observable<T>` holds the latest published value. Subscribers receive
//! that value first, then every later value; a subscriber that falls behind
//! only sees the newest one. Dropping a `Subscription` unsubscribes it.

use tokio::sync::watch;

/// Publisher side: owns the current value.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Replaces the current value and notifies subscribers.
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Mutates the current value in place and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Mutates the current value; subscribers are notified only if `f` returns true.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(f)
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
            replayed: false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Default for Observable<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Subscriber side of an `Observable`.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    replayed: bool,
}

impl<T: Clone> Subscription<T> {
    /// The latest published value.
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Waits for the next value.
    ///
    /// The first call returns the value current at subscription time without
    /// waiting. Returns `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<T> {
        if !self.replayed {
            self.replayed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Returns a value only if one was published since the last read.
    pub fn try_next(&mut self) -> Option<T> {
        if !self.replayed {
            self.replayed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }
}
