use crate::config::ClientConfig;
use crate::error::ProviderError;
use crate::Result;

/// Status and body of a provider response, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout));

        let client = builder
            .build()
            .map_err(|e| ProviderError::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// POST a JSON body and return the raw status/body pair.
    ///
    /// Non-2xx statuses are returned, not raised; only transport failures are errors.
    pub async fn post_json(
        &self,
        url: &str,
        request_body: &serde_json::Value,
        client_request_id: Option<&str>,
    ) -> Result<RawResponse> {
        let mut req = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .json(request_body);

        if let Some(id) = client_request_id {
            req = req.header("x-request-id", id);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ProviderError::Transport(TransportError::Http(e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(TransportError::Http(e)))?;

        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout(),
            TransportError::Other(_) => false,
        }
    }
}
