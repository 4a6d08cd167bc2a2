//! JSON output parser with optional schema validation.

use super::schema::{format_instructions, json_schema_from_type};
use crate::error::{Error, ErrorContext};
use crate::runnable::Runnable;
use crate::types::Message;
use crate::Result;
use async_trait::async_trait;
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// Tried in order after a direct parse fails.
static EXTRACTORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"```json\s*([\s\S]*?)\s*```",
        r"```\s*([\s\S]*?)\s*```",
        r"\{[\s\S]*\}",
        r"\[[\s\S]*\]",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

#[derive(Clone)]
pub struct JsonOutputParser {
    schema: Option<Value>,
    validator: Option<Arc<JSONSchema>>,
}

impl fmt::Debug for JsonOutputParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonOutputParser")
            .field("schema", &self.schema)
            .finish()
    }
}

impl Default for JsonOutputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonOutputParser {
    /// Accept any JSON value.
    pub fn new() -> Self {
        Self {
            schema: None,
            validator: None,
        }
    }

    pub fn with_schema(schema: Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| {
                Error::configuration_with_context(
                    "invalid output schema",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("json_output_parser"),
                )
            })?;
        Ok(Self {
            schema: Some(schema),
            validator: Some(Arc::new(compiled)),
        })
    }

    /// Schema derived from `T`, with doc comments as field descriptions.
    pub fn for_type<T: schemars::JsonSchema>() -> Result<Self> {
        Self::with_schema(json_schema_from_type::<T>())
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    pub fn format_instructions(&self) -> String {
        format_instructions(self.schema.as_ref())
    }

    /// Extract a JSON value from model output and validate it.
    ///
    /// Accepts raw JSON, fenced code blocks, or text surrounding a single object/array.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let value = extract_json(text.trim()).ok_or_else(|| {
            Error::output_parse("model output does not contain JSON", text)
        })?;

        if let Some(validator) = &self.validator {
            let violations: Vec<String> = match validator.validate(&value) {
                Ok(()) => Vec::new(),
                Err(errors) => errors
                    .map(|e| {
                        let path = e.instance_path.to_string();
                        if path.is_empty() {
                            e.to_string()
                        } else {
                            format!("{}: {}", path, e)
                        }
                    })
                    .collect(),
            };
            if !violations.is_empty() {
                return Err(Error::OutputParse {
                    message: format!("output does not match schema ({} violations)", violations.len()),
                    violations,
                    raw: text.to_string(),
                });
            }
        }

        Ok(value)
    }

    pub fn parse_into<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        let value = self.parse(text)?;
        serde_json::from_value(value).map_err(|e| {
            Error::output_parse(format!("cannot deserialize output: {}", e), text)
        })
    }
}

#[async_trait]
impl Runnable for JsonOutputParser {
    type Input = Message;
    type Output = Value;

    async fn invoke(&self, input: Message) -> Result<Value> {
        self.parse(&input.content)
    }
}

fn extract_json(text: &str) -> Option<Value> {
    if let Ok(parsed) = serde_json::from_str::<Value>(text) {
        return Some(parsed);
    }

    for re in EXTRACTORS.iter() {
        if let Some(captures) = re.captures(text) {
            let candidate = match captures.get(1) {
                Some(inner) => inner.as_str(),
                None => captures.get(0).map(|c| c.as_str()).unwrap_or(text),
            };
            if let Ok(parsed) = serde_json::from_str::<Value>(candidate.trim()) {
                return Some(parsed);
            }
        }
    }

    None
}
