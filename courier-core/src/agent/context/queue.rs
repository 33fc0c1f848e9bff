use std::sync::Arc;

use rst_common::with_tokio::tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use rst_common::with_tokio::tokio::sync::Mutex;

use super::types::ContextError;

/// `InboundQueue` is a FIFO queue of inbound messages waiting to be processed
///
/// Producers never block, and there is only a single consumer at a time. There is no priority,
/// items are always dequeued in the order they were enqueued
pub struct InboundQueue<T> {
    sender: UnboundedSender<T>,
    receiver: Arc<Mutex<UnboundedReceiver<T>>>,
}

impl<T> Clone for InboundQueue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

impl<T: Send> InboundQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    pub fn enqueue(&self, item: T) -> Result<(), ContextError> {
        self.sender
            .send(item)
            .map_err(|_| ContextError::QueueError("queue receiver already closed".to_string()))
    }

    /// `dequeue` takes the oldest item without waiting, `None` means the queue is empty
    pub async fn dequeue(&self) -> Option<T> {
        let mut receiver = self.receiver.lock().await;
        receiver.try_recv().ok()
    }

    /// `next` waits until an item is available
    pub async fn next(&self) -> Option<T> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }
}

impl<T: Send> Default for InboundQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
