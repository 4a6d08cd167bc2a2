//! Lessons 1 and 2: a single prompt, then the same request through a chat template.

use crate::client::ChatModel;
use crate::prompt::{ChatPromptTemplate, PromptValue};
use crate::Result;
use serde_json::{json, Value};

pub const ACTIVITY_SYSTEM: &str =
    "Você é um assistente criativo que ajuda a criar planos de atividades para crianças.";

pub const ACTIVITY_TEMPLATE: &str = "Crie um plano de atividades para {numero_dias} dias para {numero_criancas} crianças, focando em atividades relacionadas a {atividade}. Cada dia deve incluir uma atividade principal e uma breve descrição.";

/// Parameters of an activity plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRequest {
    pub days: u32,
    pub children: u32,
    pub activity: String,
}

impl Default for ActivityRequest {
    fn default() -> Self {
        Self {
            days: 7,
            children: 2,
            activity: "música".to_string(),
        }
    }
}

impl ActivityRequest {
    pub fn to_vars(&self) -> Value {
        json!({
            "numero_dias": self.days,
            "numero_criancas": self.children,
            "atividade": self.activity,
        })
    }

    /// The request written out as plain text.
    pub fn prompt(&self) -> String {
        format!(
            "Crie um plano de atividades para {} dias para {} crianças, \
             focando em atividades relacionadas a {}. \
             Cada dia deve incluir uma atividade principal e uma breve descrição.",
            self.days, self.children, self.activity
        )
    }
}

/// A plan and the prompt that produced it.
#[derive(Debug, Clone)]
pub struct TemplatedPlan {
    pub prompt: PromptValue,
    pub plan: String,
}

/// Send the request as one user message and return the reply.
pub async fn activity_plan(model: &ChatModel, request: &ActivityRequest) -> Result<String> {
    model.invoke_text(&request.prompt()).await
}

pub fn activity_prompt() -> Result<ChatPromptTemplate> {
    ChatPromptTemplate::from_messages([("system", ACTIVITY_SYSTEM), ("user", ACTIVITY_TEMPLATE)])
}

/// Format [`activity_prompt`] and send the resulting system and user messages.
pub async fn activity_plan_with_template(
    model: &ChatModel,
    request: &ActivityRequest,
) -> Result<TemplatedPlan> {
    let messages = activity_prompt()?.format_messages(&request.to_vars())?;
    let response = model.invoke_messages(&messages).await?;
    Ok(TemplatedPlan {
        prompt: PromptValue::Messages(messages),
        plan: response.content,
    })
}
