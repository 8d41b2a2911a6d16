//! Raw chronological history.

use super::ConversationMemory;
use crate::api::{ChatModel, ModelFuture};
use crate::{Message, Role};

/// Append-only list of messages in insertion order. Unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.append(Role::Human, content);
    }

    pub fn add_ai_message(&mut self, content: impl Into<String>) {
        self.append(Role::Ai, content);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// One `Role: content` line per message. Empty when nothing is stored.
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(Message::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ConversationMemory for ChatHistory {
    fn history(&self) -> String {
        self.render()
    }

    fn save_turn<'a>(
        &'a mut self,
        _model: &'a dyn ChatModel,
        input: &'a str,
        output: &'a str,
    ) -> ModelFuture<'a, ()> {
        self.add_user_message(input);
        self.add_ai_message(output);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedModel;

    #[test]
    fn empty_history_renders_empty() {
        assert_eq!(ChatHistory::new().render(), "");
    }

    #[test]
    fn renders_in_insertion_order() {
        let mut history = ChatHistory::new();
        history.add_user_message("hello");
        history.add_ai_message("hi there");
        history.add_user_message("bye");
        assert_eq!(history.render(), "User: hello\nAI: hi there\nUser: bye");
        assert_eq!(history.len(), 3);
    }

    #[tokio::test]
    async fn save_turn_grows_by_two_without_model_calls() {
        let model = ScriptedModel::new();
        let mut history = ChatHistory::new();
        for i in 0..4 {
            history
                .save_turn(&model, &format!("q{i}"), &format!("a{i}"))
                .await
                .unwrap();
        }
        assert_eq!(history.len(), 8);
        assert_eq!(model.call_count(), 0);
        let roles: Vec<Role> = history.messages().iter().map(Message::role).collect();
        assert_eq!(&roles[..2], &[Role::Human, Role::Ai]);
        assert_eq!(history.messages()[7].content(), "a3");
    }
}
