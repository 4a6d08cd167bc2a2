//! Session-scoped conversation memory.
//!
//! A [`SessionRegistry`] maps opaque session ids to [`MessageHistory`] instances,
//! created lazily on first use. A [`HistoryAwareInvoker`] wraps any [`Responder`]
//! so every call sees the prior turns of its session and, on success, records the
//! new user turn and the reply.
//!
//! ```rust,no_run
//! use promptchain::memory::{HistoryAwareInvoker, SessionRegistry};
//! use promptchain::ChatModel;
//! use std::sync::Arc;
//!
//! # async fn run() -> promptchain::Result<()> {
//! let model = ChatModel::from_env()?;
//! let invoker = HistoryAwareInvoker::new(model, Arc::new(SessionRegistry::new()), "Be brief.");
//! let first = invoker.invoke("s1", "Cities with beaches?").await?;
//! let second = invoker.invoke("s1", "Best season to visit them?").await?;
//! assert_eq!(invoker.history("s1").len(), 4);
//! # let _ = (first, second);
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is persisted; histories live as long as their registry.

pub mod history;
pub mod invoker;
pub mod registry;
pub mod responder;

pub use history::MessageHistory;
pub use invoker::HistoryAwareInvoker;
pub use registry::SessionRegistry;
pub use responder::{ChainResponder, Responder, SYSTEM_KEY};
