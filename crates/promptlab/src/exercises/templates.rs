//! A prompt template piped into the model and parsed to plain text.

use crate::Result;
use crate::api::ChatModel;
use crate::chain::LlmChain;
use crate::prompt::{ChatPromptTemplate, Variables};
use std::io::Write;

pub const JOKE_TEMPLATE: &str = "Tell me a joke about {topic}";

pub const DEFAULT_TOPIC: &str = "bears";

pub async fn run(model: &dyn ChatModel, topic: &str, out: &mut dyn Write) -> Result<String> {
    let chain = LlmChain::new(ChatPromptTemplate::from_template(JOKE_TEMPLATE), model);
    let joke = chain
        .invoke_text(&Variables::new().with("topic", topic))
        .await?;
    writeln!(out, "{joke}")?;
    Ok(joke)
}
