//! Mock HTTP server setup for integration tests
#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use promptchain::{ChatModel, ChatModelBuilder};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const COMPLETIONS_PATH: &str = "/chat/completions";
pub const TEST_API_KEY: &str = "sk-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// A chat model pointed at the mock server
    pub fn model(&self) -> ChatModel {
        ChatModelBuilder::new(TEST_API_KEY)
            .base_url_override(&self.base_url)
            .build()
            .expect("mock model")
    }

    /// Reply with `content` to every completion request
    pub async fn mock_completion(&self, content: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(content))
            .create_async()
            .await
    }

    /// Reply with `content` only to requests whose body matches `pattern`
    pub async fn mock_completion_matching(&self, pattern: &str, content: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::Regex(pattern.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(content))
            .create_async()
            .await
    }

    /// Create a mock for an error response
    pub async fn mock_error_response(&self, status: usize, error_body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .create_async()
            .await
    }
}

/// OpenAI-shaped completion body carrying `content`
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
    })
    .to_string()
}
