//! Conversation with rolling-summary memory. Each turn costs one extra
//! model call to rewrite the summary.

use super::run_conversation;
use crate::Result;
use crate::api::ChatModel;
use crate::memory::SummaryMemory;
use std::io::Write;

pub async fn run(model: &dyn ChatModel, out: &mut dyn Write) -> Result<SummaryMemory> {
    let mut memory = SummaryMemory::new();
    run_conversation(model, &mut memory, out).await?;

    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "\nCurrent Conversation History:")?;
    writeln!(out, "{}", memory.render())?;
    Ok(memory)
}
