//! Conversation memory.
//!
//! Two strategies share the [`ConversationMemory`] trait so a
//! [`ConversationChain`](crate::chain::ConversationChain) can drive either:
//!
//! - [`ChatHistory`] keeps every message verbatim and renders them as
//!   `User: ...` / `AI: ...` lines.
//! - [`SummaryMemory`] keeps one rolling summary, regenerated by the model
//!   after every turn.
//!
//! Memory is always owned by the caller and passed to each turn.

pub mod history;
pub mod summary;

pub use history::ChatHistory;
pub use summary::{SUMMARY_PROMPT, SummaryMemory};

use crate::api::{ChatModel, ModelFuture};

/// State carried between conversation turns.
pub trait ConversationMemory: Send {
    /// Text substituted for `{history}` in the conversation prompt.
    fn history(&self) -> String;

    /// Record one completed turn. `model` is available to strategies that
    /// need an extra call (summarization); others ignore it.
    fn save_turn<'a>(
        &'a mut self,
        model: &'a dyn ChatModel,
        input: &'a str,
        output: &'a str,
    ) -> ModelFuture<'a, ()>;
}
