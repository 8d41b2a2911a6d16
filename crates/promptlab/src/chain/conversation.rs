use crate::api::ChatModel;
use crate::memory::ConversationMemory;
use crate::prompt::{ChatPromptTemplate, Variables};
use crate::{Message, Result};
use tracing::debug;

/// System prompt for memory-backed conversations. Variable: `history`.
pub const CONVERSATION_PROMPT: &str = "\
The following is a friendly conversation between a human and an AI. The AI is talkative and provides lots of specific details based on the existing chat history. If the AI does not know the answer to a question, it truthfully says it does not know.

## Chat history:
{history}";

/// A chat turn runner that threads history through a
/// [`ConversationMemory`].
///
/// The prompt is a system message rendered with `{history}` followed by a
/// human message rendered with `{input}`.
#[derive(Clone)]
pub struct ConversationChain<'a> {
    prompt: ChatPromptTemplate,
    model: &'a dyn ChatModel,
}

impl<'a> ConversationChain<'a> {
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self::with_prompt(
            ChatPromptTemplate::new()
                .system(CONVERSATION_PROMPT)
                .human("{input}"),
            model,
        )
    }

    /// Use a custom prompt. It may reference `{history}` and `{input}`.
    pub fn with_prompt(prompt: ChatPromptTemplate, model: &'a dyn ChatModel) -> Self {
        Self { prompt, model }
    }

    /// Run one turn: render history and input, invoke the model, then save
    /// the turn into `memory`.
    ///
    /// Nothing is saved if the model call fails. If saving fails (a
    /// summarizing memory's extra call) the error is returned and the reply
    /// is lost.
    pub async fn predict(
        &self,
        memory: &mut dyn ConversationMemory,
        input: &str,
    ) -> Result<Message> {
        let history = memory.history();
        let vars = Variables::new()
            .with("history", history.as_str())
            .with("input", input);
        let messages = self.prompt.format_messages(&vars)?;
        debug!("Conversation turn: history={} chars", history.len());

        let reply = self.model.invoke(&messages).await?;
        memory.save_turn(self.model, input, reply.content()).await?;
        Ok(reply)
    }
}

impl std::fmt::Debug for ConversationChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationChain")
            .field("prompt", &self.prompt)
            .field("model", &self.model.config().model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Reply, ScriptedModel};
    use crate::memory::{ChatHistory, SummaryMemory};
    use crate::{ApiRole, Role};

    #[tokio::test]
    async fn history_is_rendered_into_system_prompt() {
        let model = ScriptedModel::new()
            .when("I'm Bob", "Hello Bob!")
            .when("my name", "Your name is Bob.");
        let chain = ConversationChain::new(&model);
        let mut history = ChatHistory::new();

        chain.predict(&mut history, "I'm Bob").await.unwrap();
        let reply = chain.predict(&mut history, "What's my name?").await.unwrap();
        assert_eq!(reply.content(), "Your name is Bob.");
        assert_eq!(history.len(), 4);
        assert_eq!(history.messages()[3], Message::new(Role::Ai, "Your name is Bob."));

        let second = &model.requests()[1];
        assert_eq!(second.messages[0].role, ApiRole::System);
        let system = second.messages[0].content.as_deref().unwrap();
        assert!(system.ends_with("## Chat history:\nUser: I'm Bob\nAI: Hello Bob!"));
    }

    #[tokio::test]
    async fn failed_turn_saves_nothing() {
        let model = ScriptedModel::new().then(Reply::Fail("boom".into()));
        let chain = ConversationChain::new(&model);
        let mut history = ChatHistory::new();
        assert!(chain.predict(&mut history, "hi").await.is_err());
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn summary_memory_costs_one_extra_call_per_turn() {
        let model = ScriptedModel::new()
            .when("Progressively summarize", "The user said hi.")
            .otherwise("Hi!");
        let chain = ConversationChain::new(&model);
        let mut memory = SummaryMemory::new();
        for input in ["hi", "hello again"] {
            chain.predict(&mut memory, input).await.unwrap();
        }
        assert_eq!(model.call_count(), 4);
        assert_eq!(memory.render(), "The user said hi.");
    }
}
