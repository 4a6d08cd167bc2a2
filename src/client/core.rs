use crate::client::builder::ChatModelBuilder;
use crate::config::ClientConfig;
use crate::error::ProviderError;
use crate::error_code::StandardErrorCode;
use crate::memory::Responder;
use crate::prompt::PromptValue;
use crate::runnable::Runnable;
use crate::transport::{HttpTransport, RawResponse};
use crate::types::Message;
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Chat-completions client for one model.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct ChatModel {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) endpoint: String,
}

impl fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatModel")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
    /// Correlation id sent as `x-request-id`.
    pub request_id: String,
}

impl ChatResponse {
    pub fn into_message(self) -> Message {
        Message::assistant(self.content)
    }
}

impl ChatModel {
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        ChatModelBuilder::from_config(config).build()
    }

    /// Load [`ClientConfig`] from the environment and build a model from it.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn build_request_body(&self, messages: &[Message]) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(t) = self.config.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(mt) = self.config.max_tokens {
            body["max_tokens"] = json!(mt);
        }
        body
    }

    /// One chat-completions call. No retries.
    pub async fn invoke_messages(&self, messages: &[Message]) -> Result<ChatResponse> {
        let request_id = Uuid::new_v4().to_string();
        let body = self.build_request_body(messages);

        let start = std::time::Instant::now();
        let raw = self
            .transport
            .post_json(&self.endpoint, &body, Some(&request_id))
            .await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !raw.is_success() {
            let err = error_from_response(&raw);
            warn!(
                model = %self.config.model,
                request_id = %request_id,
                http_status = raw.status,
                latency_ms,
                error = %err,
                "chat completion failed"
            );
            return Err(err.into());
        }

        let response = parse_response(&raw.body, request_id)?;
        info!(
            model = %self.config.model,
            request_id = %response.request_id,
            http_status = raw.status,
            latency_ms,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "chat completion finished"
        );
        Ok(response)
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn invoke_text(&self, prompt: &str) -> Result<String> {
        Ok(self
            .invoke_messages(&[Message::user(prompt)])
            .await?
            .content)
    }
}

#[async_trait]
impl Runnable for ChatModel {
    type Input = PromptValue;
    type Output = Message;

    fn name(&self) -> String {
        format!("ChatModel({})", self.config.model)
    }

    async fn invoke(&self, input: PromptValue) -> Result<Message> {
        let messages = input.into_messages();
        Ok(self.invoke_messages(&messages).await?.into_message())
    }
}

#[async_trait]
impl Responder for ChatModel {
    async fn respond(&self, system: &str, history: &[Message], user_text: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !system.is_empty() {
            messages.push(Message::system(system));
        }
        messages.extend_from_slice(history);
        messages.push(Message::user(user_text));
        Ok(self.invoke_messages(&messages).await?.content)
    }
}

fn parse_response(body: &str, request_id: String) -> std::result::Result<ChatResponse, ProviderError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

    let content = json
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| {
            ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
        })?;
    let finish_reason = json
        .pointer("/choices/0/finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);
    let usage = json.get("usage").filter(|u| u.is_object()).map(|u| Usage {
        prompt_tokens: u["prompt_tokens"].as_u64().unwrap_or(0),
        completion_tokens: u["completion_tokens"].as_u64().unwrap_or(0),
        total_tokens: u["total_tokens"].as_u64().unwrap_or(0),
    });

    Ok(ChatResponse {
        content,
        finish_reason,
        usage,
        request_id,
    })
}

/// OpenAI-style error body: `{"error": {"message", "type", "code"}}`.
fn error_from_response(raw: &RawResponse) -> ProviderError {
    let json: Option<Value> = serde_json::from_str(&raw.body).ok();
    let error = json.as_ref().and_then(|j| j.get("error"));

    let code = str_field(error, "code");
    let kind = str_field(error, "type");
    let message = str_field(error, "message")
        .map(String::from)
        .unwrap_or_else(|| {
            let body = raw.body.trim();
            if body.is_empty() {
                format!("HTTP {}", raw.status)
            } else {
                body.chars().take(200).collect()
            }
        });

    // `type` is coarser than `code`; consult it only when nothing else classifies.
    let class = match StandardErrorCode::classify(raw.status, code) {
        StandardErrorCode::Unknown => kind
            .and_then(StandardErrorCode::from_provider_code)
            .unwrap_or(StandardErrorCode::Unknown),
        class => class,
    };
    ProviderError::Remote {
        status: raw.status,
        class,
        code: code.or(kind).map(String::from),
        message,
        retryable: class.retryable(),
    }
}

fn str_field<'a>(error: Option<&'a Value>, name: &str) -> Option<&'a str> {
    error.and_then(|e| e.get(name)).and_then(|v| v.as_str())
}
