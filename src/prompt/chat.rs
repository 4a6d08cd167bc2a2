//! Chat prompt template: a list of role-tagged templates.

use super::{PromptTemplate, PromptValue};
use crate::error::{Error, ErrorContext};
use crate::runnable::Runnable;
use crate::types::{Message, MessageRole};
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTemplate {
    /// A single message whose content is a template.
    Role(MessageRole, PromptTemplate),
    /// Expands the named variable, a JSON array of `{role, content}` objects, in place.
    /// A missing or null variable expands to nothing.
    Placeholder(String),
}

impl MessageTemplate {
    pub fn system(template: &str) -> Result<Self> {
        Ok(MessageTemplate::Role(
            MessageRole::System,
            PromptTemplate::new(template)?,
        ))
    }

    pub fn user(template: &str) -> Result<Self> {
        Ok(MessageTemplate::Role(MessageRole::User, PromptTemplate::new(template)?))
    }

    pub fn assistant(template: &str) -> Result<Self> {
        Ok(MessageTemplate::Role(
            MessageRole::Assistant,
            PromptTemplate::new(template)?,
        ))
    }

    pub fn placeholder(variable: impl Into<String>) -> Self {
        MessageTemplate::Placeholder(variable.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPromptTemplate {
    messages: Vec<MessageTemplate>,
}

impl ChatPromptTemplate {
    pub fn new(messages: Vec<MessageTemplate>) -> Self {
        Self { messages }
    }

    /// Build from `(kind, template)` pairs.
    ///
    /// `kind` is a role (`system`, `user`/`human`, `assistant`/`ai`) or `placeholder`,
    /// in which case `template` is `{variable}` or a bare variable name.
    pub fn from_messages<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut messages = Vec::new();
        for (kind, template) in pairs {
            if kind == "placeholder" {
                let name = template
                    .trim()
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .trim();
                if name.is_empty() {
                    return Err(Error::template_with_context(
                        "placeholder needs a variable name",
                        ErrorContext::new().with_source("chat_prompt_template"),
                    ));
                }
                messages.push(MessageTemplate::placeholder(name));
                continue;
            }
            let role: MessageRole = kind.parse().map_err(|e: String| {
                Error::template_with_context(
                    e,
                    ErrorContext::new()
                        .with_field_path(kind.to_string())
                        .with_source("chat_prompt_template"),
                )
            })?;
            messages.push(MessageTemplate::Role(role, PromptTemplate::new(template)?));
        }
        Ok(Self { messages })
    }

    pub fn partial(mut self, name: &str, value: &str) -> Self {
        for m in &mut self.messages {
            if let MessageTemplate::Role(_, t) = m {
                *t = t.clone().partial(name, value);
            }
        }
        self
    }

    /// Variables referenced by any message template or placeholder.
    pub fn input_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for m in &self.messages {
            let vars = match m {
                MessageTemplate::Role(_, t) => t.input_variables(),
                MessageTemplate::Placeholder(name) => vec![name.clone()],
            };
            for v in vars {
                if !names.contains(&v) {
                    names.push(v);
                }
            }
        }
        names
    }

    /// Render every message. A system message that renders blank is left out.
    pub fn format_messages(&self, vars: &Value) -> Result<Vec<Message>> {
        let mut out = Vec::with_capacity(self.messages.len());
        for m in &self.messages {
            match m {
                MessageTemplate::Role(role, template) => {
                    let content = template.format(vars)?;
                    if *role == MessageRole::System && content.trim().is_empty() {
                        continue;
                    }
                    out.push(Message::new(*role, content));
                }
                MessageTemplate::Placeholder(name) => match vars.get(name) {
                    None | Some(Value::Null) => {}
                    Some(value) => {
                        let history: Vec<Message> = serde_json::from_value(value.clone())
                            .map_err(|e| {
                                Error::template_with_context(
                                    format!("placeholder '{}' is not a message list", name),
                                    ErrorContext::new()
                                        .with_field_path(name.clone())
                                        .with_details(e.to_string())
                                        .with_source("chat_prompt_template"),
                                )
                            })?;
                        out.extend(history);
                    }
                },
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Runnable for ChatPromptTemplate {
    type Input = Value;
    type Output = PromptValue;

    async fn invoke(&self, input: Value) -> Result<PromptValue> {
        Ok(PromptValue::Messages(self.format_messages(&input)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn travel_prompt() -> ChatPromptTemplate {
        ChatPromptTemplate::from_messages([
            ("system", "Você recomenda cidades turísticas."),
            ("placeholder", "{historico}"),
            ("human", "{query}"),
        ])
        .unwrap()
    }

    #[test]
    fn test_system_and_user_messages() {
        let prompt = ChatPromptTemplate::from_messages([
            ("system", "Você é um assistente criativo."),
            ("user", "Plano de {numero_dias} dias"),
        ])
        .unwrap();
        let messages = prompt.format_messages(&json!({"numero_dias": 7})).unwrap();
        assert_eq!(
            messages,
            vec![
                Message::system("Você é um assistente criativo."),
                Message::user("Plano de 7 dias"),
            ]
        );
    }

    #[test]
    fn test_placeholder_expands_history_in_place() {
        let vars = json!({
            "query": "E a melhor época?",
            "historico": [
                {"role": "user", "content": "Cidades com praias?"},
                {"role": "assistant", "content": "Florianópolis."}
            ]
        });
        let messages = travel_prompt().format_messages(&vars).unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], Message::user("Cidades com praias?"));
        assert_eq!(messages[2], Message::assistant("Florianópolis."));
        assert_eq!(messages[3], Message::user("E a melhor época?"));
    }

    #[test]
    fn test_missing_placeholder_expands_to_nothing() {
        let messages = travel_prompt()
            .format_messages(&json!({"query": "Oi"}))
            .unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_bad_placeholder_value() {
        let err = travel_prompt()
            .format_messages(&json!({"query": "Oi", "historico": "not a list"}))
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(ChatPromptTemplate::from_messages([("tool", "x")]).is_err());
        assert!(ChatPromptTemplate::from_messages([("placeholder", "{}")]).is_err());
    }

    #[test]
    fn test_input_variables_include_placeholders() {
        assert_eq!(travel_prompt().input_variables(), vec!["historico", "query"]);
    }

    #[test]
    fn test_blank_system_message_is_dropped() {
        let prompt = ChatPromptTemplate::from_messages([
            ("system", "{system}"),
            ("placeholder", "{historico}"),
            ("human", "{query}"),
        ])
        .unwrap();
        let messages = prompt
            .format_messages(&json!({"system": "", "query": "oi"}))
            .unwrap();
        assert_eq!(messages, vec![Message::user("oi")]);
    }
}
