use crate::types::Message;
use std::sync::RwLock;
use tokio::sync::{Mutex, MutexGuard};

/// Append-only, chronologically ordered turns of one conversation.
#[derive(Debug, Default)]
pub struct MessageHistory {
    turns: RwLock<Vec<Message>>,
    // Serializes invocations on this session; never held by readers.
    gate: Mutex<()>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: Message) {
        self.turns
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }

    /// Append a user turn and its reply together. Readers never see one without the other.
    pub fn append_turn(&self, user: Message, assistant: Message) {
        let mut turns = self.turns.write().unwrap_or_else(|e| e.into_inner());
        turns.reserve(2);
        turns.push(user);
        turns.push(assistant);
    }

    /// Point-in-time copy; later appends are not reflected.
    pub fn snapshot(&self) -> Vec<Message> {
        self.turns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.turns.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) async fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}
