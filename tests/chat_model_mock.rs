//! ChatModel against a mock chat-completions server.

mod integration;

use integration::mock_server::{completion_body, MockServerFixture, COMPLETIONS_PATH};
use mockito::Matcher;
use promptchain::prompt::PromptValue;
use promptchain::runnable::Runnable;
use promptchain::{Error, Message, MessageRole, ProviderError, StandardErrorCode};
use serde_json::json;

#[tokio::test]
async fn test_completion_returns_content_and_usage() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("Florianópolis").await;

    let response = fixture
        .model()
        .invoke_messages(&[Message::user("Sugira uma cidade")])
        .await
        .unwrap();

    assert_eq!(response.content, "Florianópolis");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 20);
    assert!(!response.request_id.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_carries_auth_headers_and_sampling() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .match_header("authorization", "Bearer sk-test")
            .match_header("x-request-id", Matcher::Regex("^[0-9a-f-]{36}$".into()))
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.7,
                "max_tokens": 500,
                "stream": false,
                "messages": [
                    {"role": "system", "content": "seja breve"},
                    {"role": "user", "content": "oi"}
                ]
            })))
            .with_status(200)
            .with_body(completion_body("olá"))
            .create_async()
            .await
    };

    let reply = fixture
        .model()
        .invoke_messages(&[Message::system("seja breve"), Message::user("oi")])
        .await
        .unwrap();
    assert_eq!(reply.content, "olá");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_runnable_turns_text_prompt_into_user_turn() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::PartialJson(json!({
                "messages": [{"role": "user", "content": "Sugira uma cidade"}]
            })))
            .with_status(200)
            .with_body(completion_body("Recife"))
            .create_async()
            .await
    };

    let message = fixture
        .model()
        .invoke(PromptValue::from("Sugira uma cidade"))
        .await
        .unwrap();
    assert_eq!(message.role, MessageRole::Assistant);
    assert_eq!(message.content, "Recife");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_classified_and_not_retryable() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response(
            401,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        )
        .await;

    let err = fixture
        .model()
        .invoke_text("oi")
        .await
        .unwrap_err();

    match err {
        Error::Provider(ProviderError::Remote {
            status,
            class,
            message,
            retryable,
            ..
        }) => {
            assert_eq!(status, 401);
            assert_eq!(class, StandardErrorCode::Authentication);
            assert_eq!(message, "Incorrect API key provided");
            assert!(!retryable);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_retryable_hint_only() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response(
            429,
            r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#,
        )
        .await;

    let err = fixture.model().invoke_text("oi").await.unwrap_err();
    match &err {
        Error::Provider(p) => {
            assert!(p.is_retryable());
            assert_eq!(p.status(), Some(429));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // No retries: exactly one request reached the server.
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_content_is_malformed_response() {
    let fixture = MockServerFixture::new().await;
    let _mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await
    };

    let err = fixture.model().invoke_text("oi").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Provider(ProviderError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let model = promptchain::ChatModelBuilder::new("sk-test")
        .base_url_override("http://127.0.0.1:9")
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .unwrap();

    let err = model.invoke_text("oi").await.unwrap_err();
    assert!(matches!(err, Error::Provider(ProviderError::Transport(_))));
}
