//! Rolling-summary memory.
//!
//! Keeps a single running summary that is rewritten after every turn: the
//! previous summary plus the new exchange go to the model in one cheap call,
//! and the reply replaces the stored summary outright. The conversation
//! itself is never re-summarized from scratch.

use super::ConversationMemory;
use crate::api::{ChatModel, ModelFuture};
use crate::prompt::{ChatPromptTemplate, Variables};
use crate::{Message, Result};
use tracing::{debug, warn};

/// Progressive summarization prompt. Variables: `summary`, `new_lines`.
pub const SUMMARY_PROMPT: &str = "\
Progressively summarize the lines of conversation provided, adding onto the previous summary and returning a new summary.

EXAMPLE
Current summary:
The user asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good.

New lines of conversation:
User: Why do you think artificial intelligence is a force for good?
AI: Because artificial intelligence will help humans reach their full potential.

New summary:
The user asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good because it will help humans reach their full potential.
END OF EXAMPLE

Current summary:
{summary}

New lines of conversation:
{new_lines}

New summary:";

/// Memory that stores one model-written summary instead of raw messages.
#[derive(Debug, Clone)]
pub struct SummaryMemory {
    summary: String,
    prompt: ChatPromptTemplate,
    updates: usize,
}

impl Default for SummaryMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryMemory {
    pub fn new() -> Self {
        Self::with_prompt(ChatPromptTemplate::from_template(SUMMARY_PROMPT))
    }

    /// Use a custom summarization prompt. It should reference `{summary}`
    /// and `{new_lines}`.
    pub fn with_prompt(prompt: ChatPromptTemplate) -> Self {
        Self {
            summary: String::new(),
            prompt,
            updates: 0,
        }
    }

    /// The latest summary exactly as the model returned it. Empty before the
    /// first update.
    pub fn render(&self) -> &str {
        &self.summary
    }

    /// Number of successful updates so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Build the summarization messages for one turn.
    pub fn build_request(&self, user_turn: &str, ai_turn: &str) -> Result<Vec<Message>> {
        let new_lines = format!(
            "{}\n{}",
            Message::human(user_turn).transcript_line(),
            Message::ai(ai_turn).transcript_line()
        );
        let vars = Variables::new()
            .with("summary", self.summary.as_str())
            .with("new_lines", new_lines);
        self.prompt.format_messages(&vars)
    }

    /// Fold one turn into the summary with a single model call.
    ///
    /// On failure the previous summary is left untouched and the error is
    /// returned.
    pub async fn update(
        &mut self,
        model: &dyn ChatModel,
        user_turn: &str,
        ai_turn: &str,
    ) -> Result<()> {
        let messages = self.build_request(user_turn, ai_turn)?;
        let reply = match model.invoke(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Summary update failed, keeping previous summary: {e}");
                return Err(e);
            }
        };
        let summary = reply.into_content();
        debug!(
            "Summary updated: {} -> {} chars",
            self.summary.len(),
            summary.len()
        );
        self.summary = summary;
        self.updates += 1;
        Ok(())
    }
}

impl ConversationMemory for SummaryMemory {
    fn history(&self) -> String {
        self.summary.clone()
    }

    fn save_turn<'a>(
        &'a mut self,
        model: &'a dyn ChatModel,
        input: &'a str,
        output: &'a str,
    ) -> ModelFuture<'a, ()> {
        Box::pin(self.update(model, input, output))
    }
}
