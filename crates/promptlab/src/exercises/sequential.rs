//! Two-stage pipeline: a classic dish from a location, then its recipe.

use crate::api::ChatModel;
use crate::chain::{LlmChain, SequentialChain, SequentialOutput};
use crate::prompt::{ChatPromptTemplate, Variables};
use crate::{Error, Message, Result};
use std::io::Write;

pub const CHEF_PROMPT: &str =
    "You are a culinary expert who knows traditional dishes from around the world.";

pub const LOCATION_TEMPLATE: &str =
    "What is a classic dish from {location}? Please provide just the name of the dish.";

pub const RECIPE_TEMPLATE: &str =
    "Please provide a short and simple recipe for how to make {meal} at home.";

/// Message reported when no location is given.
pub const MISSING_LOCATION: &str = "please provide a country name as an argument";

/// Reject an absent or blank location.
pub fn require_location(arg: Option<&str>) -> Result<&str> {
    match arg.map(str::trim) {
        Some(location) if !location.is_empty() => Ok(location),
        _ => Err(Error::MissingArgument(MISSING_LOCATION.to_string())),
    }
}

fn chef_prompt(template: &str) -> ChatPromptTemplate {
    ChatPromptTemplate::new()
        .message(Message::system(CHEF_PROMPT))
        .human(template)
}

/// Location chain feeding `meal` into the recipe chain.
pub fn pipeline(model: &dyn ChatModel) -> SequentialChain<'_> {
    SequentialChain::new(
        LlmChain::new(chef_prompt(LOCATION_TEMPLATE), model),
        "meal",
        LlmChain::new(chef_prompt(RECIPE_TEMPLATE), model),
    )
}

pub async fn run(
    model: &dyn ChatModel,
    location: &str,
    out: &mut dyn Write,
) -> Result<SequentialOutput> {
    writeln!(out, "Cooking up a recipe from {location}...")?;
    out.flush()?;
    let result = pipeline(model)
        .invoke(&Variables::new().with("location", location))
        .await?;
    writeln!(out, "{}", result.output.content())?;
    Ok(result)
}
