use crate::error::{Error, ErrorContext};
use crate::runnable::Runnable;
use crate::types::Message;
use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Variable under which [`ChainResponder`] passes the system instruction.
pub const SYSTEM_KEY: &str = "system";

/// Produces an assistant reply from a system instruction, the prior turns of a
/// session and the new user text.
///
/// Implemented by [`ChatModel`](crate::ChatModel) and by [`ChainResponder`].
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, system: &str, history: &[Message], user_text: &str) -> Result<String>;
}

#[async_trait]
impl<R> Responder for Arc<R>
where
    R: Responder + ?Sized,
{
    async fn respond(&self, system: &str, history: &[Message], user_text: &str) -> Result<String> {
        (**self).respond(system, history, user_text).await
    }
}

/// Runs a `Value → String` chain as a [`Responder`].
///
/// The chain receives a JSON object with the user text under `input_key`, the
/// prior turns under `history_key` and the system instruction under
/// [`SYSTEM_KEY`], so a [`ChatPromptTemplate`](crate::prompt::ChatPromptTemplate)
/// with a history placeholder can sit at its head. An empty instruction is
/// passed as `""`; the chat template drops a system message that renders blank.
pub struct ChainResponder<R> {
    chain: R,
    input_key: String,
    history_key: String,
}

impl<R> ChainResponder<R>
where
    R: Runnable<Input = Value, Output = String>,
{
    /// Fails when a key collides with [`SYSTEM_KEY`] or the two keys are equal.
    pub fn new(
        chain: R,
        input_key: impl Into<String>,
        history_key: impl Into<String>,
    ) -> Result<Self> {
        let input_key = input_key.into();
        let history_key = history_key.into();

        for (field, key) in [("input_key", &input_key), ("history_key", &history_key)] {
            if key == SYSTEM_KEY {
                return Err(Error::configuration_with_context(
                    format!("'{}' is reserved for the system instruction", SYSTEM_KEY),
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_source("chain_responder"),
                ));
            }
        }
        if input_key == history_key {
            return Err(Error::configuration_with_context(
                format!("input and history share the key '{}'", input_key),
                ErrorContext::new()
                    .with_field_path("history_key")
                    .with_source("chain_responder"),
            ));
        }

        Ok(Self {
            chain,
            input_key,
            history_key,
        })
    }
}

#[async_trait]
impl<R> Responder for ChainResponder<R>
where
    R: Runnable<Input = Value, Output = String>,
{
    async fn respond(&self, system: &str, history: &[Message], user_text: &str) -> Result<String> {
        let mut vars = Map::new();
        vars.insert(SYSTEM_KEY.to_string(), Value::String(system.to_string()));
        vars.insert(self.history_key.clone(), serde_json::to_value(history)?);
        vars.insert(self.input_key.clone(), Value::String(user_text.to_string()));
        self.chain.invoke(Value::Object(vars)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ChatPromptTemplate, PromptValue};
    use crate::runnable::{RunnableExt, RunnableLambda};

    #[tokio::test]
    async fn test_chain_responder_feeds_keys() {
        let chain = RunnableLambda::new("echo", |vars: Value| {
            let turns = vars["historico"].as_array().map(|a| a.len()).unwrap_or(0);
            Ok(format!(
                "{} | {} | {} prior",
                vars["system"].as_str().unwrap_or_default(),
                vars["query"].as_str().unwrap_or_default(),
                turns
            ))
        });
        let responder = ChainResponder::new(chain, "query", "historico").unwrap();
        let history = vec![Message::user("oi"), Message::assistant("olá")];
        let reply = responder
            .respond("seja breve", &history, "tudo bem?")
            .await
            .unwrap();
        assert_eq!(reply, "seja breve | tudo bem? | 2 prior");
    }

    #[test]
    fn test_reserved_or_shared_keys_are_rejected() {
        let echo = || RunnableLambda::new("echo", |vars: Value| Ok(vars.to_string()));

        let err = ChainResponder::new(echo(), "query", SYSTEM_KEY).err().unwrap();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("history_key"));

        let err = ChainResponder::new(echo(), SYSTEM_KEY, "historico").err().unwrap();
        assert!(err.to_string().contains("input_key"));

        assert!(ChainResponder::new(echo(), "query", "query").is_err());
        assert!(ChainResponder::new(echo(), "query", "historico").is_ok());
    }

    #[tokio::test]
    async fn test_empty_system_matches_bare_model_shape() {
        let prompt = ChatPromptTemplate::from_messages([
            ("system", "{system}"),
            ("placeholder", "{historico}"),
            ("human", "{query}"),
        ])
        .unwrap();
        let chain = prompt.pipe(RunnableLambda::new("roles", |p: PromptValue| {
            Ok(p.into_messages()
                .iter()
                .map(|m| m.role.to_string())
                .collect::<Vec<_>>()
                .join(","))
        }));
        let responder = ChainResponder::new(chain, "query", "historico").unwrap();

        let roles = responder
            .respond("", &[Message::user("oi"), Message::assistant("olá")], "e agora?")
            .await
            .unwrap();
        assert_eq!(roles, "user,assistant,user");

        let roles = responder.respond("seja breve", &[], "oi").await.unwrap();
        assert_eq!(roles, "system,user");
    }
}
