//! Output parsers: the last stage of a chain.
//!
//! - [`StrOutputParser`]: the reply text, unchanged.
//! - [`JsonOutputParser`]: JSON extracted from the reply and checked against a schema.
//!
//! ```
//! use promptchain::output::JsonOutputParser;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct City {
//!     /// Name of the suggested city
//!     name: String,
//! }
//!
//! let parser = JsonOutputParser::for_type::<City>().unwrap();
//! let city: City = parser
//!     .parse_into("```json\n{\"name\": \"Salvador\"}\n```")
//!     .unwrap();
//! assert_eq!(city.name, "Salvador");
//! assert!(parser.format_instructions().contains("Name of the suggested city"));
//! ```

pub mod json;
pub mod schema;
pub mod text;

pub use json::JsonOutputParser;
pub use schema::{format_instructions, json_schema_from_type};
pub use text::StrOutputParser;
