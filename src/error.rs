use crate::error_code::StandardErrorCode;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "OPENAI_API_KEY", "template.cidade")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config", "prompt_template")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure of the external responder (the chat-completions provider).
///
/// Every variant leaves conversation state untouched; callers decide whether to retry.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {status} ({class}): {message}")]
    Remote {
        status: u16,
        class: StandardErrorCode,
        /// Provider-specific code from the error body, when present.
        code: Option<String>,
        message: String,
        retryable: bool,
    },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Failure raised by a non-HTTP responder (test doubles, custom backends).
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn other(msg: impl Into<String>) -> Self {
        ProviderError::Other(msg.into())
    }

    /// Whether the failure is transient according to its standard error class.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Remote { retryable, .. } => *retryable,
            ProviderError::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Unified error type for promptchain.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Template error: {message}{}", format_context(.context))]
    Template {
        message: String,
        context: ErrorContext,
    },

    #[error("Output parse error: {message} (output: {raw:?})")]
    OutputParse {
        message: String,
        /// Individual schema violations, empty when the text was not JSON at all.
        violations: Vec<String>,
        raw: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::template_with_context(msg, ErrorContext::new())
    }

    /// Create a new template error with structured context
    pub fn template_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Template {
            message: msg.into(),
            context,
        }
    }

    pub fn output_parse(msg: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::OutputParse {
            message: msg.into(),
            violations: Vec::new(),
            raw: raw.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Template { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Error::Provider(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_in_display() {
        let err = Error::configuration_with_context(
            "missing provider credential",
            ErrorContext::new()
                .with_field_path("OPENAI_API_KEY")
                .with_source("config"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: missing provider credential (field: OPENAI_API_KEY, source: config)"
        );
        assert!(err.is_configuration());
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("OPENAI_API_KEY")
        );
    }

    #[test]
    fn test_remote_provider_error_display() {
        let err: Error = ProviderError::Remote {
            status: 429,
            class: StandardErrorCode::RateLimited,
            code: Some("rate_limit_exceeded".into()),
            message: "slow down".into(),
            retryable: true,
        }
        .into();
        assert!(err.is_provider());
        assert_eq!(err.to_string(), "Provider error: HTTP 429 (E2001): slow down");
    }

    #[test]
    fn test_other_provider_error_is_not_retryable() {
        let err = ProviderError::other("stub failure");
        assert!(!err.is_retryable());
        assert_eq!(err.status(), None);
    }
}
