//! Lessons 3 to 5: chains that suggest a city, a restaurant and a cultural activity.

use crate::client::ChatModel;
use crate::output::{JsonOutputParser, StrOutputParser};
use crate::prompt::PromptTemplate;
use crate::runnable::{Runnable, RunnableExt};
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CITY_TEMPLATE: &str = "Sugira uma cidade dado o meu interesse por {interesse}.";
pub const DESTINATION_TEMPLATE: &str =
    "Sugira uma cidade dado o meu interesse por {interesse}.{formato_de_saida}";
pub const RESTAURANT_TEMPLATE: &str =
    "Sugira um restaurante dado o meu interesse por {cidade}.{formato_de_saida}";
pub const CULTURAL_TEMPLATE: &str = "Sugira atividade cultural dada a minha sugestão de cidade {cidade} ";

const FORMAT_VAR: &str = "formato_de_saida";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TouristDestination {
    #[serde(rename = "cidade")]
    #[schemars(description = "Nome da cidade sugerida")]
    pub city: String,
    #[serde(rename = "motivo")]
    #[schemars(description = "Motivo pelo qual a cidade é recomendada")]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Restaurant {
    #[serde(rename = "cidade")]
    #[schemars(description = "Nome da cidade sugerida")]
    pub city: String,
    #[serde(rename = "restaurante")]
    #[schemars(description = "Nome do restaurante recomendado")]
    pub restaurant: String,
}

/// `{interesse}` → free-text suggestion.
pub fn city_chain(model: &ChatModel) -> Result<impl Runnable<Input = Value, Output = String>> {
    Ok(PromptTemplate::new(CITY_TEMPLATE)?
        .pipe(model.clone())
        .pipe(StrOutputParser::new()))
}

/// `{interesse}` → `{"cidade", "motivo"}`.
pub fn destination_chain(model: &ChatModel) -> Result<impl Runnable<Input = Value, Output = Value>> {
    json_chain::<TouristDestination>(model, DESTINATION_TEMPLATE)
}

/// `{cidade}` → `{"cidade", "restaurante"}`.
pub fn restaurant_chain(model: &ChatModel) -> Result<impl Runnable<Input = Value, Output = Value>> {
    json_chain::<Restaurant>(model, RESTAURANT_TEMPLATE)
}

/// `{cidade}` → free-text suggestion.
pub fn cultural_chain(model: &ChatModel) -> Result<impl Runnable<Input = Value, Output = String>> {
    Ok(PromptTemplate::new(CULTURAL_TEMPLATE)?
        .pipe(model.clone())
        .pipe(StrOutputParser::new()))
}

fn json_chain<T: JsonSchema>(
    model: &ChatModel,
    template: &str,
) -> Result<impl Runnable<Input = Value, Output = Value>> {
    let parser = JsonOutputParser::for_type::<T>()?;
    let prompt = PromptTemplate::new(template)?.partial(FORMAT_VAR, parser.format_instructions());
    Ok(prompt.pipe(model.clone()).pipe(parser))
}

pub async fn suggest_city(model: &ChatModel, interest: &str) -> Result<String> {
    city_chain(model)?.invoke(json!({ "interesse": interest })).await
}

/// The destination as validated JSON.
pub async fn suggest_destination(model: &ChatModel, interest: &str) -> Result<Value> {
    destination_chain(model)?
        .invoke(json!({ "interesse": interest }))
        .await
}

/// Destination, then a restaurant in that city, then a cultural activity there.
///
/// Each stage's JSON output is the next stage's template input, so `cidade`
/// flows through the whole chain.
pub async fn plan_trip(model: &ChatModel, interest: &str) -> Result<String> {
    let chain = destination_chain(model)?
        .pipe(restaurant_chain(model)?)
        .pipe(cultural_chain(model)?);
    chain.invoke(json!({ "interesse": interest })).await
}
