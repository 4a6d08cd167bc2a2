use super::history::MessageHistory;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Session id → history. Owned by the caller; there is no global instance.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<MessageHistory>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the history for `session_id`, creating an empty one on first use.
    ///
    /// Ids are opaque; any string, including the empty one, is a valid key.
    /// Concurrent first calls for one id all receive the same instance.
    pub fn get_or_create(&self, session_id: &str) -> Arc<MessageHistory> {
        if let Some(history) = self.get(session_id) {
            return history;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let history = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, "session created");
                Arc::new(MessageHistory::new())
            });
        Arc::clone(history)
    }

    /// Lookup without creating.
    pub fn get(&self, session_id: &str) -> Option<Arc<MessageHistory>> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(session_id)
            .cloned()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known session ids, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
