//! Prompt templates.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PromptTemplate`] | One text template with `{name}` placeholders |
//! | [`ChatPromptTemplate`] | Role-tagged message templates plus history placeholders |
//! | [`PromptValue`] | What a template renders to, and what a chat model consumes |
//!
//! Template variables are passed as a JSON object so the output of a JSON parser
//! can feed the next prompt directly.

pub mod chat;
pub mod template;

pub use chat::{ChatPromptTemplate, MessageTemplate};
pub use template::PromptTemplate;

use crate::types::Message;

/// Rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValue {
    Text(String),
    Messages(Vec<Message>),
}

impl PromptValue {
    /// Chat-model view: plain text becomes a single user turn.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            PromptValue::Text(text) => vec![Message::user(text)],
            PromptValue::Messages(messages) => messages,
        }
    }
}

impl std::fmt::Display for PromptValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptValue::Text(text) => f.write_str(text),
            PromptValue::Messages(messages) => {
                for (i, m) in messages.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", m)?;
                }
                Ok(())
            }
        }
    }
}

impl From<String> for PromptValue {
    fn from(text: String) -> Self {
        PromptValue::Text(text)
    }
}

impl From<&str> for PromptValue {
    fn from(text: &str) -> Self {
        PromptValue::Text(text.to_string())
    }
}

impl From<Vec<Message>> for PromptValue {
    fn from(messages: Vec<Message>) -> Self {
        PromptValue::Messages(messages)
    }
}
