use crate::client::core::ChatModel;
use crate::config::{validate_base_url, ClientConfig};
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`ChatModel`].
///
/// Starts from a [`ClientConfig`] and lets callers override individual knobs.
pub struct ChatModelBuilder {
    config: ClientConfig,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl ChatModelBuilder {
    /// Defaults plus an explicit credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            base_url_override: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f64) -> Self {
        self.config.temperature = Some(t);
        self
    }

    /// Omit `temperature` from requests and let the provider default apply.
    pub fn provider_default_temperature(mut self) -> Self {
        self.config.temperature = None;
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Override the configured base URL.
    ///
    /// This is primarily for testing with mock servers or pointing at a local
    /// OpenAI-compatible gateway.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<ChatModel> {
        let mut config = self.config;
        let base_url = self.base_url_override.unwrap_or(config.base_url);
        config.base_url = validate_base_url(&base_url, "base_url")?;

        let transport = Arc::new(HttpTransport::new(&config)?);
        tracing::debug!(
            model = %config.model,
            base_url = %config.base_url,
            "chat model configured"
        );

        Ok(ChatModel {
            endpoint: config.chat_completions_url(),
            config: Arc::new(config),
            transport,
        })
    }
}
