//! Single-text prompt template with `{name}` placeholders.
//!
//! `{{` and `}}` render literal braces. Variables are looked up in the JSON object
//! passed to [`PromptTemplate::format`] first, then in the partial variables bound
//! with [`PromptTemplate::partial`].

use super::PromptValue;
use crate::error::{Error, ErrorContext};
use crate::runnable::Runnable;
use crate::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variable name pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    segments: Vec<Segment>,
    partials: BTreeMap<String, String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let segments = parse(&template)?;
        Ok(Self {
            template,
            segments,
            partials: BTreeMap::new(),
        })
    }

    /// Pre-bind a variable, e.g. the format instructions of an output parser.
    pub fn partial(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.partials.insert(name.into(), value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Variables the caller still has to supply, in order of first appearance.
    pub fn input_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for seg in &self.segments {
            if let Segment::Variable(name) = seg {
                if !self.partials.contains_key(name) && !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    pub fn partial_variables(&self) -> &BTreeMap<String, String> {
        &self.partials
    }

    /// Render the template. `vars` must be a JSON object; unknown keys are ignored.
    pub fn format(&self, vars: &Value) -> Result<String> {
        let map = match vars {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                return Err(Error::template_with_context(
                    "template variables must be a JSON object",
                    ErrorContext::new()
                        .with_details(format!("got {}", json_type(other)))
                        .with_source("prompt_template"),
                ))
            }
        };

        let mut out = String::with_capacity(self.template.len());
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    if let Some(value) = map.and_then(|m| m.get(name)) {
                        out.push_str(&render_value(value));
                    } else if let Some(value) = self.partials.get(name) {
                        out.push_str(value);
                    } else {
                        return Err(Error::template_with_context(
                            format!("missing template variable '{}'", name),
                            ErrorContext::new()
                                .with_field_path(name.clone())
                                .with_details(format!(
                                    "expected variables: {}",
                                    self.input_variables().join(", ")
                                ))
                                .with_source("prompt_template"),
                        ));
                    }
                }
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Runnable for PromptTemplate {
    type Input = Value;
    type Output = PromptValue;

    async fn invoke(&self, input: Value) -> Result<PromptValue> {
        Ok(PromptValue::Text(self.format(&input)?))
    }
}

/// Strings render verbatim; anything else renders as its JSON text.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(malformed(template, pos, "unclosed '{'"));
                }

                let name = name.trim();
                if !VARIABLE_NAME.is_match(name) {
                    return Err(malformed(
                        template,
                        pos,
                        &format!("invalid variable name {:?}", name),
                    ));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                    continue;
                }
                return Err(malformed(template, pos, "unmatched '}' (use '}}' for a literal brace)"));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn malformed(template: &str, pos: usize, reason: &str) -> Error {
    Error::template_with_context(
        format!("malformed template: {}", reason),
        ErrorContext::new()
            .with_details(format!("at byte {} of {:?}", pos, template))
            .with_source("prompt_template"),
    )
}
