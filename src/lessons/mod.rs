//! The six lessons ("aulas"), each a small pipeline over a [`ChatModel`].
//!
//! | # | Function | Pipeline |
//! |---|----------|----------|
//! | 1 | [`activity_plan`] | text prompt → model |
//! | 2 | [`activity_plan_with_template`] | chat template → model |
//! | 3 | [`suggest_city`] | template → model → text parser |
//! | 4 | [`suggest_destination`] | template + format instructions → model → JSON parser |
//! | 5 | [`plan_trip`] | three chains joined end to end |
//! | 6 | [`travel_chat`] | chat template with history → model, per session |

pub mod activities;
pub mod conversation;
pub mod travel;

pub use activities::{activity_plan, activity_plan_with_template, ActivityRequest, TemplatedPlan};
pub use conversation::{travel_chat, travel_responder, Exchange, TRAVEL_QUESTIONS, TRAVEL_SESSION};
pub use travel::{plan_trip, suggest_city, suggest_destination, Restaurant, TouristDestination};

use crate::client::ChatModel;
use crate::Result;
use std::str::FromStr;

/// Interest used by lessons 3 to 5.
pub const DEFAULT_INTEREST: &str = "praias";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lesson {
    ActivityPlan,
    TemplatedPlan,
    SimpleChain,
    StructuredOutput,
    ChainedChains,
    ConversationMemory,
}

impl Lesson {
    pub const ALL: [Lesson; 6] = [
        Lesson::ActivityPlan,
        Lesson::TemplatedPlan,
        Lesson::SimpleChain,
        Lesson::StructuredOutput,
        Lesson::ChainedChains,
        Lesson::ConversationMemory,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Lesson::ActivityPlan => 1,
            Lesson::TemplatedPlan => 2,
            Lesson::SimpleChain => 3,
            Lesson::StructuredOutput => 4,
            Lesson::ChainedChains => 5,
            Lesson::ConversationMemory => 6,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.number() == n)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Lesson::ActivityPlan => "single prompt",
            Lesson::TemplatedPlan => "chat prompt template",
            Lesson::SimpleChain => "prompt | model | text parser",
            Lesson::StructuredOutput => "structured JSON output",
            Lesson::ChainedChains => "chained chains",
            Lesson::ConversationMemory => "conversation memory",
        }
    }

    /// Run the lesson and render what it prints.
    pub async fn run(&self, model: &ChatModel) -> Result<String> {
        let out = match self {
            Lesson::ActivityPlan => {
                let plan = activity_plan(model, &ActivityRequest::default()).await?;
                format!("Plano de Atividades:\n{}\n", plan)
            }
            Lesson::TemplatedPlan => {
                let result = activity_plan_with_template(model, &ActivityRequest::default()).await?;
                format!(
                    "Gerando plano de atividades...\nPrompt enviado para o modelo:\n{}\nPlano de Atividades:\n{}\n",
                    result.prompt, result.plan
                )
            }
            Lesson::SimpleChain => format!("{}\n", suggest_city(model, DEFAULT_INTEREST).await?),
            Lesson::StructuredOutput => {
                let value = suggest_destination(model, DEFAULT_INTEREST).await?;
                format!("{}\n", serde_json::to_string_pretty(&value)?)
            }
            Lesson::ChainedChains => format!("{}\n", plan_trip(model, DEFAULT_INTEREST).await?),
            Lesson::ConversationMemory => travel_chat(travel_responder(model)?, &TRAVEL_QUESTIONS)
                .await?
                .iter()
                .map(|e| format!("Usuario: {}\nAssistente: {}\n\n", e.question, e.answer))
                .collect(),
        };
        Ok(out)
    }
}

impl std::fmt::Display for Lesson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "aula{:03} ({})", self.number(), self.title())
    }
}

impl FromStr for Lesson {
    type Err = String;

    /// Accepts `3`, `03`, `aula3` or `aula003`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("aula");
        digits
            .parse::<u8>()
            .ok()
            .and_then(Lesson::from_number)
            .ok_or_else(|| format!("unknown lesson '{}' (expected 1-6)", s))
    }
}
