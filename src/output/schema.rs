//! Schema generation and the prompt text that asks a model to follow it.

use serde_json::{json, Value};

/// JSON schema (draft 7) for a Rust type, including doc comments as descriptions.
pub fn json_schema_from_type<T: schemars::JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}

/// Instruction text appended to a prompt so the model answers with a conforming object.
///
/// The `$schema` and `title` keys are stripped from the shown schema.
pub fn format_instructions(schema: Option<&Value>) -> String {
    let Some(schema) = schema else {
        return "Return a JSON object.".to_string();
    };

    let mut shown = schema.clone();
    if let Value::Object(map) = &mut shown {
        map.remove("$schema");
        map.remove("title");
    }
    let rendered = serde_json::to_string(&shown).unwrap_or_else(|_| "{}".to_string());

    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
         As an example, for the schema {{\"properties\": {{\"foo\": {{\"description\": \"a list of strings\", \"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}\n\
         the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
         The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\n\
         Here is the output schema:\n```\n{}\n```",
        rendered
    )
}
