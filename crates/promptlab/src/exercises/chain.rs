//! Interactive information collection.
//!
//! Three chains share one system prompt. The first greets the user and asks
//! for a name, the second asks for a location given the name, and the third
//! summarizes both. Answers are read from `input` one line at a time.

use crate::api::ChatModel;
use crate::chain::LlmChain;
use crate::prompt::{ChatPromptTemplate, Variables};
use crate::{Error, Message, Result};
use serde::Serialize;
use std::io::{BufRead, Write};

pub const DATA_COLLECTOR_PROMPT: &str = "You are a friendly assistant helping to collect user information. Your responses should be warm and engaging.";

const NAME_TEMPLATE: &str = "Please greet the user and ask for their name.";

const LOCATION_TEMPLATE: &str = "\
The user's name is {name}.
Please ask them about their location in a friendly way.";

const SUMMARY_TEMPLATE: &str = "\
Please create a friendly summary for this user:
Name: {name}
Location: {location}";

/// Everything collected by one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInformation {
    pub name: String,
    pub location: String,
    pub summary: String,
}

fn collector_prompt(template: &str) -> ChatPromptTemplate {
    ChatPromptTemplate::new()
        .message(Message::system(DATA_COLLECTOR_PROMPT))
        .human(template)
}

/// Print `label`, then read one line. End of input is a missing argument.
fn prompt_line(input: &mut dyn BufRead, out: &mut dyn Write, label: &str) -> Result<String> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::MissingArgument(format!(
            "input closed before '{}' was answered",
            label.trim_end_matches([':', ' '])
        )));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run(
    model: &dyn ChatModel,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<UserInformation> {
    let name_chain = LlmChain::new(collector_prompt(NAME_TEMPLATE), model);
    let location_chain = LlmChain::new(collector_prompt(LOCATION_TEMPLATE), model);
    let summary_chain = LlmChain::new(collector_prompt(SUMMARY_TEMPLATE), model);

    let greeting = name_chain.invoke_text(&Variables::new()).await?;
    writeln!(out, "{greeting}")?;
    let name = prompt_line(input, out, "Your Name: ")?;

    let mut vars = Variables::new().with("name", name.as_str());
    let question = location_chain.invoke_text(&vars).await?;
    writeln!(out, "{question}")?;
    let location = prompt_line(input, out, "Your Location: ")?;

    vars.insert("location", location.as_str());
    let summary = summary_chain.invoke_text(&vars).await?;

    let info = UserInformation {
        name,
        location,
        summary,
    };
    writeln!(out, "\nCollected User Information:")?;
    let rendered = serde_json::to_string_pretty(&info).map_err(std::io::Error::from)?;
    writeln!(out, "{rendered}")?;
    Ok(info)
}
