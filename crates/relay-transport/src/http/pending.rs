//! Table of parked HTTP requests awaiting a reply.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use relay_core::{HttpReply, new_message_id};
use tokio::sync::oneshot;
use tracing::debug;

/// Parked requests: message_id → sender half of the reply channel.
///
/// A slot is removed exactly once, either by [`complete`](Self::complete) or
/// when its [`PendingGuard`] is dropped (timeout or client disconnect).
#[derive(Default)]
pub struct PendingRequests {
    slots: Mutex<HashMap<String, oneshot::Sender<HttpReply>>>,
}

impl PendingRequests {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a new request under a fresh message id.
    pub(crate) fn register(self: &Arc<Self>) -> (PendingGuard, oneshot::Receiver<HttpReply>) {
        let message_id = new_message_id();
        let (tx, rx) = oneshot::channel();
        self.slots.lock().insert(message_id.clone(), tx);

        let guard = PendingGuard {
            table: Arc::clone(self),
            message_id,
        };
        (guard, rx)
    }

    /// Completes the request parked under `message_id`.
    ///
    /// Returns the id if the reply was handed to a live connection.
    pub fn complete(&self, message_id: &str, reply: HttpReply) -> Option<String> {
        let tx = self.slots.lock().remove(message_id)?;
        match tx.send(reply) {
            Ok(()) => Some(message_id.to_string()),
            Err(_) => {
                debug!(message_id = %message_id, "Parked request went away before reply");
                None
            }
        }
    }

    /// Returns the number of parked requests.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Returns true if nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn discard(&self, message_id: &str) {
        self.slots.lock().remove(message_id);
    }
}

/// Removes the slot when the request handler finishes, however it finishes.
pub(crate) struct PendingGuard {
    table: Arc<PendingRequests>,
    message_id: String,
}

impl PendingGuard {
    pub(crate) fn message_id(&self) -> &str {
        &self.message_id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.table.discard(&self.message_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_delivers_reply_once() {
        let table = Arc::new(PendingRequests::new());
        let (guard, rx) = table.register();
        let id = guard.message_id().to_string();
        assert_eq!(table.len(), 1);

        assert_eq!(table.complete(&id, HttpReply::empty(200)), Some(id.clone()));
        assert_eq!(rx.await.unwrap(), HttpReply::empty(200));

        // Second completion finds nothing.
        assert_eq!(table.complete(&id, HttpReply::empty(200)), None);
        drop(guard);
        assert!(table.is_empty());
    }

    #[test]
    fn test_dropped_guard_discards_slot() {
        let table = Arc::new(PendingRequests::new());
        let (guard, _rx) = table.register();
        let id = guard.message_id().to_string();
        drop(guard);

        assert!(table.is_empty());
        assert_eq!(table.complete(&id, HttpReply::empty(200)), None);
    }

    #[test]
    fn test_complete_after_receiver_dropped() {
        let table = Arc::new(PendingRequests::new());
        let (guard, rx) = table.register();
        drop(rx);

        assert_eq!(table.complete(guard.message_id(), HttpReply::empty(200)), None);
    }

    #[test]
    fn test_unknown_message_id() {
        let table = PendingRequests::new();
        assert_eq!(table.complete("xxxx", HttpReply::empty(200)), None);
    }
}
