//! OpenAI-compatible chat model client.
//!
//! Keep the public surface small: build a [`ChatModel`] with [`ChatModelBuilder`]
//! (or straight from a [`crate::config::ClientConfig`]) and either call
//! [`ChatModel::invoke_messages`] directly or use it as a chain stage.

pub mod builder;
pub mod core;

pub use builder::ChatModelBuilder;
pub use core::{ChatModel, ChatResponse, Usage};
