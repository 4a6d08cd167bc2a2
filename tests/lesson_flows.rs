//! The lesson pipelines against a mock chat-completions server.

mod integration;

use integration::mock_server::{completion_body, MockServerFixture, COMPLETIONS_PATH};
use mockito::Matcher;
use promptchain::lessons::conversation::TRAVEL_SYSTEM;
use promptchain::lessons::{
    plan_trip, suggest_destination, travel_chat, travel_responder, ActivityRequest, Lesson,
    TouristDestination, TRAVEL_QUESTIONS,
};
use promptchain::Error;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_activity_plan_output() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_completion_matching(
            "Crie um plano de atividades para 7 dias para 2 crian",
            "Dia 1: roda de percussão",
        )
        .await;

    let out = Lesson::ActivityPlan.run(&fixture.model()).await.unwrap();
    assert_eq!(out, "Plano de Atividades:\nDia 1: roda de percussão\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_templated_plan_sends_system_persona() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::PartialJson(json!({
                "messages": [{
                    "role": "system",
                    "content": "Você é um assistente criativo que ajuda a criar planos de atividades para crianças."
                }]
            })))
            .with_status(200)
            .with_body(completion_body("Dia 1: coral"))
            .create_async()
            .await
    };

    let result = promptchain::lessons::activity_plan_with_template(
        &fixture.model(),
        &ActivityRequest {
            days: 3,
            children: 1,
            activity: "dança".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(result.plan, "Dia 1: coral");
    assert!(result
        .prompt
        .to_string()
        .contains("user: Crie um plano de atividades para 3 dias para 1 crianças"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_destination_is_parsed_and_validated() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_completion_matching(
            "Sugira uma cidade dado o meu interesse por praias",
            "```json\n{\"cidade\": \"Florianópolis\", \"motivo\": \"42 praias\"}\n```",
        )
        .await;

    let value = suggest_destination(&fixture.model(), "praias").await.unwrap();
    let destination: TouristDestination = serde_json::from_value(value).unwrap();
    assert_eq!(destination.city, "Florianópolis");
    assert_eq!(destination.reason, "42 praias");
}

#[tokio::test]
async fn test_destination_without_json_is_output_parse_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_completion("Florianópolis, com certeza!").await;

    let err = suggest_destination(&fixture.model(), "praias")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OutputParse { .. }));
}

#[tokio::test]
async fn test_destination_missing_field_lists_violation() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_completion(r#"{"cidade": "Natal"}"#).await;

    match suggest_destination(&fixture.model(), "praias").await {
        Err(Error::OutputParse { violations, .. }) => {
            assert!(violations.iter().any(|v| v.contains("motivo")), "{violations:?}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_plan_trip_threads_city_through_three_chains() {
    let fixture = MockServerFixture::new().await;
    let city = fixture
        .mock_completion_matching(
            "Sugira uma cidade dado o meu interesse por praias",
            r#"{"cidade": "Natal", "motivo": "dunas e praias"}"#,
        )
        .await;
    let restaurant = fixture
        .mock_completion_matching(
            "Sugira um restaurante dado o meu interesse por Natal",
            r#"{"cidade": "Natal", "restaurante": "Camarões"}"#,
        )
        .await;
    let cultural = fixture
        .mock_completion_matching(
            "Sugira atividade cultural dada a minha sugest[^ ]+ de cidade Natal",
            "Visite o Forte dos Reis Magos.",
        )
        .await;

    let answer = plan_trip(&fixture.model(), "praias").await.unwrap();
    assert_eq!(answer, "Visite o Forte dos Reis Magos.");
    city.assert_async().await;
    restaurant.assert_async().await;
    cultural.assert_async().await;
}

#[tokio::test]
async fn test_travel_chat_replays_history_with_system_instruction() {
    let fixture = MockServerFixture::new().await;
    let model = fixture.model();

    let first = fixture.mock_completion("Florianópolis e Natal.").await;
    let responder = Arc::new(travel_responder(&model).unwrap());
    let opening = travel_chat(Arc::clone(&responder), &TRAVEL_QUESTIONS[..1])
        .await
        .unwrap();
    assert_eq!(opening[0].answer, "Florianópolis e Natal.");
    first.remove_async().await;

    let second = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::PartialJson(json!({
                "messages": [
                    {"role": "system", "content": TRAVEL_SYSTEM},
                    {"role": "user", "content": TRAVEL_QUESTIONS[0]},
                    {"role": "assistant", "content": "Florianópolis e Natal."},
                    {"role": "user", "content": TRAVEL_QUESTIONS[1]}
                ]
            })))
            .with_status(200)
            .with_body(completion_body("De dezembro a março."))
            .create_async()
            .await
    };
    // A fresh session: the first question goes out without history.
    let fallback = fixture.mock_completion("Florianópolis e Natal.").await;

    let transcript = travel_chat(responder, &TRAVEL_QUESTIONS).await.unwrap();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].answer, "De dezembro a março.");
    second.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_conversation_lesson_output() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(200)
            .with_body(completion_body("Salvador."))
            .expect(2)
            .create_async()
            .await
    };

    let out = Lesson::ConversationMemory.run(&fixture.model()).await.unwrap();
    assert_eq!(
        out,
        format!(
            "Usuario: {}\nAssistente: Salvador.\n\nUsuario: {}\nAssistente: Salvador.\n\n",
            TRAVEL_QUESTIONS[0], TRAVEL_QUESTIONS[1]
        )
    );
    mock.assert_async().await;
}
