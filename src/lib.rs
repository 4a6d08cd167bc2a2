//! # promptchain
//!
//! Small LLM orchestration toolkit for OpenAI-compatible chat-completions APIs.
//!
//! ## Overview
//!
//! Prompts, the model call and output parsing are all [`runnable::Runnable`] stages
//! joined with `pipe`. Conversations are kept per session in a
//! [`memory::SessionRegistry`] and replayed to the model by a
//! [`memory::HistoryAwareInvoker`].
//!
//! ## Key Features
//!
//! - **Chat model**: [`ChatModel`] posts to `{base_url}/chat/completions` and classifies failures
//! - **Templates**: [`prompt::PromptTemplate`] and [`prompt::ChatPromptTemplate`] with partials and history placeholders
//! - **Parsers**: [`output::StrOutputParser`] and schema-validated [`output::JsonOutputParser`]
//! - **Session memory**: append-only histories, one per session id, created on first use
//! - **Lessons**: the six walkthrough pipelines in [`lessons`], runnable through the `aulas` binary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promptchain::output::StrOutputParser;
//! use promptchain::prompt::PromptTemplate;
//! use promptchain::runnable::{Runnable, RunnableExt};
//! use promptchain::ChatModel;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> promptchain::Result<()> {
//!     let model = ChatModel::from_env()?;
//!     let chain = PromptTemplate::new("Suggest a city for someone who likes {interest}.")?
//!         .pipe(model)
//!         .pipe(StrOutputParser::new());
//!
//!     println!("{}", chain.invoke(json!({"interest": "beaches"})).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! [`ClientConfig::from_env`] reads `OPENAI_API_KEY` (required) plus optional
//! `OPENAI_BASE_URL`, `PROMPTCHAIN_MODEL`, `PROMPTCHAIN_TEMPERATURE`,
//! `PROMPTCHAIN_MAX_TOKENS` and `AI_HTTP_TIMEOUT_SECS`. A `.env` file in the
//! working directory is loaded first when present.

pub mod client;
pub mod config;
pub mod error;
pub mod error_code;
pub mod lessons;
pub mod memory;
pub mod output;
pub mod prompt;
pub mod runnable;
pub mod transport;
pub mod types;

pub use crate::client::{ChatModel, ChatModelBuilder, ChatResponse, Usage};
pub use crate::config::ClientConfig;
pub use crate::error::{Error, ErrorContext, ProviderError};
pub use crate::error_code::StandardErrorCode;
pub use crate::memory::{HistoryAwareInvoker, MessageHistory, Responder, SessionRegistry};
pub use crate::types::{Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
