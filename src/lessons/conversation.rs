//! Lesson 6: a travel assistant that remembers the conversation.

use crate::client::ChatModel;
use crate::memory::{ChainResponder, HistoryAwareInvoker, Responder, SessionRegistry};
use crate::output::StrOutputParser;
use crate::prompt::ChatPromptTemplate;
use crate::runnable::{Runnable, RunnableExt};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

pub const TRAVEL_SYSTEM: &str = "Você é um assistente especializado em recomendar cidades turísticas com base nos interesses do usuário.";

pub const TRAVEL_SESSION: &str = "aula006_sessao1";

pub const TRAVEL_QUESTIONS: [&str; 2] = [
    "Quero visitar cidades com muitas praias. Quais você recomenda?",
    "Qual a melhor epoca do ano para visitar essas cidades?",
];

pub const QUERY_KEY: &str = "query";
pub const HISTORY_KEY: &str = "historico";

/// One question and the answer it got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// System instruction, prior turns, then the new question.
pub fn travel_prompt() -> Result<ChatPromptTemplate> {
    ChatPromptTemplate::from_messages([
        ("system", "{system}"),
        ("placeholder", "{historico}"),
        ("human", "{query}"),
    ])
}

pub fn travel_chain(model: &ChatModel) -> Result<impl Runnable<Input = Value, Output = String>> {
    Ok(travel_prompt()?
        .pipe(model.clone())
        .pipe(StrOutputParser::new()))
}

/// The lesson's chain as a [`Responder`].
pub fn travel_responder(model: &ChatModel) -> Result<impl Responder> {
    ChainResponder::new(travel_chain(model)?, QUERY_KEY, HISTORY_KEY)
}

/// Ask `questions` in order within one session of a fresh registry.
///
/// Stops at the first failure; earlier exchanges stay recorded in the session.
pub async fn travel_chat<R: Responder>(responder: R, questions: &[&str]) -> Result<Vec<Exchange>> {
    let registry = Arc::new(SessionRegistry::new());
    let invoker = HistoryAwareInvoker::new(responder, registry, TRAVEL_SYSTEM);

    let mut transcript = Vec::with_capacity(questions.len());
    for question in questions {
        let answer = invoker.invoke(TRAVEL_SESSION, question).await?;
        transcript.push(Exchange {
            question: question.to_string(),
            answer,
        });
    }
    Ok(transcript)
}
