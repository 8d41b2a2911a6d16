//! Conversation with raw-history memory.

use super::run_conversation;
use crate::Result;
use crate::api::ChatModel;
use crate::memory::ChatHistory;
use std::io::Write;

pub async fn run(model: &dyn ChatModel, out: &mut dyn Write) -> Result<ChatHistory> {
    let mut history = ChatHistory::new();
    run_conversation(model, &mut history, out).await?;

    writeln!(out, "\nCurrent Conversation History:")?;
    writeln!(out, "{}", history.render())?;
    Ok(history)
}
