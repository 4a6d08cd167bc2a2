use super::registry::SessionRegistry;
use super::responder::Responder;
use crate::types::Message;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Calls a [`Responder`] with the prior turns of a session and records the exchange.
pub struct HistoryAwareInvoker<R> {
    responder: R,
    registry: Arc<SessionRegistry>,
    system: String,
}

impl<R: Responder> HistoryAwareInvoker<R> {
    pub fn new(responder: R, registry: Arc<SessionRegistry>, system: impl Into<String>) -> Self {
        Self {
            responder,
            registry,
            system: system.into(),
        }
    }

    /// Send `user_text` in the context of `session_id` and return the reply.
    ///
    /// On success the user turn and the reply are appended as one pair. On
    /// failure the error is returned and the history is left untouched. Calls on
    /// the same session run one at a time; distinct sessions do not wait on each
    /// other.
    pub async fn invoke(&self, session_id: &str, user_text: &str) -> Result<String> {
        let history = self.registry.get_or_create(session_id);
        let _turn = history.lock_turn().await;

        let prior = history.snapshot();
        let start = Instant::now();
        match self.responder.respond(&self.system, &prior, user_text).await {
            Ok(reply) => {
                history.append_turn(Message::user(user_text), Message::assistant(reply.clone()));
                debug!(
                    session_id,
                    prior_turns = prior.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "session turn recorded"
                );
                Ok(reply)
            }
            Err(e) => {
                warn!(session_id, error = %e, "session turn failed; history unchanged");
                Err(e)
            }
        }
    }

    /// Snapshot of the session's turns. Creates the session if it is new.
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.registry.get_or_create(session_id).snapshot()
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}
