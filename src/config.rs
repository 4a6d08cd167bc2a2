//! Runtime configuration loaded from the environment.
//!
//! The provider credential is the only required setting. Everything else has a
//! default matching the lessons (`gpt-3.5-turbo`, temperature 0.7, 500 tokens) and
//! can be overridden through env-knobs:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENAI_API_KEY` | required |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `PROMPTCHAIN_MODEL` | `gpt-3.5-turbo` |
//! | `PROMPTCHAIN_TEMPERATURE` | `0.7` |
//! | `PROMPTCHAIN_MAX_TOKENS` | `500` |
//! | `AI_HTTP_TIMEOUT_SECS` | `30` |
//! | `AI_HTTP_POOL_MAX_IDLE_PER_HOST` | `8` |
//! | `AI_HTTP_POOL_IDLE_TIMEOUT_SECS` | `90` |

use crate::error::{Error, ErrorContext};
use crate::Result;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "PROMPTCHAIN_MODEL";
pub const TEMPERATURE_VAR: &str = "PROMPTCHAIN_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "PROMPTCHAIN_MAX_TOKENS";
pub const TIMEOUT_VAR: &str = "AI_HTTP_TIMEOUT_SECS";
pub const POOL_MAX_IDLE_VAR: &str = "AI_HTTP_POOL_MAX_IDLE_PER_HOST";
pub const POOL_IDLE_TIMEOUT_VAR: &str = "AI_HTTP_POOL_IDLE_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    /// Idle connections kept per host by the HTTP client.
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

// Keep the credential out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults with an explicit credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS),
        }
    }

    /// Load `.env` from the working directory (if any), then read the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(Error::configuration_with_context(
                    format!("failed to read .env file: {}", e),
                    ErrorContext::new().with_source("config"),
                ))
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            Error::configuration_with_context(
                "missing provider credential",
                ErrorContext::new()
                    .with_field_path(API_KEY_VAR)
                    .with_details("set it in the environment or in a .env file")
                    .with_source("config"),
            )
        })?;

        let mut cfg = Self::new(api_key);

        if let Some(base_url) = get(BASE_URL_VAR) {
            cfg.base_url = validate_base_url(&base_url, BASE_URL_VAR)?;
        }
        if let Some(model) = get(MODEL_VAR) {
            cfg.model = model;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            let t: f64 = parse_var(TEMPERATURE_VAR, &raw)?;
            if !(0.0..=2.0).contains(&t) {
                return Err(Error::configuration_with_context(
                    "temperature out of range",
                    ErrorContext::new()
                        .with_field_path(TEMPERATURE_VAR)
                        .with_details(format!("expected 0.0..=2.0, got {}", t))
                        .with_source("config"),
                ));
            }
            cfg.temperature = Some(t);
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            cfg.max_tokens = Some(parse_var(MAX_TOKENS_VAR, &raw)?);
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            let secs: u64 = parse_var(TIMEOUT_VAR, &raw)?;
            if secs == 0 {
                return Err(Error::configuration_with_context(
                    "timeout must be at least one second",
                    ErrorContext::new()
                        .with_field_path(TIMEOUT_VAR)
                        .with_details("got 0")
                        .with_source("config"),
                ));
            }
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(POOL_MAX_IDLE_VAR) {
            cfg.pool_max_idle_per_host = parse_var(POOL_MAX_IDLE_VAR, &raw)?;
        }
        if let Some(raw) = get(POOL_IDLE_TIMEOUT_VAR) {
            cfg.pool_idle_timeout = Duration::from_secs(parse_var(POOL_IDLE_TIMEOUT_VAR, &raw)?);
        }

        Ok(cfg)
    }

    /// URL of the chat-completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        Error::configuration_with_context(
            format!("invalid value {:?}", raw),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(e.to_string())
                .with_source("config"),
        )
    })
}

pub(crate) fn validate_base_url(raw: &str, field: &str) -> Result<String> {
    let parsed = url::Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL {:?}", raw),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(e.to_string())
                .with_source("config"),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("unsupported URL scheme {:?}", parsed.scheme()),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("config"),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
