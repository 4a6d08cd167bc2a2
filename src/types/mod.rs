//! Core data types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | One conversation turn: a closed role plus text |
//! | [`MessageRole`] | `system`, `user` or `assistant` |
//!
//! ```rust
//! use promptchain::types::{Message, MessageRole};
//!
//! let system = Message::system("You recommend tourist cities.");
//! let user = Message::user("Which beach cities do you recommend?");
//! assert_eq!(system.role, MessageRole::System);
//! assert!(user.is_user());
//! ```

pub mod message;

pub use message::{Message, MessageRole};
