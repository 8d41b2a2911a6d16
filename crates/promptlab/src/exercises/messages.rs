//! Forming a conversation from role-tagged messages.

use crate::api::ChatModel;
use crate::{Message, Result};
use std::io::Write;

pub const SYSTEM_PROMPT: &str =
    "You are a nice AI bot that helps a user figure out what to eat in one short sentence";

/// System prompt, a question, a prior AI answer, and a follow-up.
pub fn conversation() -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::human("I like tomatoes, what should I eat?"),
        Message::ai("How about a fresh caprese salad?"),
        Message::human("A good idea. Can you give me a recipe?"),
    ]
}

pub async fn run(model: &dyn ChatModel, out: &mut dyn Write) -> Result<Message> {
    let reply = model.invoke(&conversation()).await?;
    writeln!(out, "{}", reply.content())?;
    Ok(reply)
}
