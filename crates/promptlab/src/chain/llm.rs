use crate::api::ChatModel;
use crate::prompt::{ChatPromptTemplate, Variables};
use crate::{Message, Result};
use tracing::debug;

/// A prompt template plus the model it is sent to.
#[derive(Clone)]
pub struct LlmChain<'a> {
    prompt: ChatPromptTemplate,
    model: &'a dyn ChatModel,
}

impl<'a> LlmChain<'a> {
    pub fn new(prompt: ChatPromptTemplate, model: &'a dyn ChatModel) -> Self {
        Self { prompt, model }
    }

    /// Render the prompt from `vars` and return the model's reply.
    ///
    /// A missing template variable fails before any model call.
    pub async fn invoke(&self, vars: &Variables) -> Result<Message> {
        let messages = self.prompt.format_messages(vars)?;
        debug!(
            "Invoking chain: {} message(s), variables={:?}",
            messages.len(),
            self.prompt.input_variables()
        );
        self.model.invoke(&messages).await
    }

    /// [`invoke`](Self::invoke), keeping only the reply text.
    pub async fn invoke_text(&self, vars: &Variables) -> Result<String> {
        Ok(self.invoke(vars).await?.into_content())
    }
}

impl std::fmt::Debug for LlmChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmChain")
            .field("prompt", &self.prompt)
            .field("model", &self.model.config().model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::api::ScriptedModel;

    #[tokio::test]
    async fn renders_prompt_and_returns_text() {
        let model = ScriptedModel::new().when("joke about bears", "Why do bears hibernate?");
        let chain = LlmChain::new(
            ChatPromptTemplate::from_template("Tell me a joke about {topic}"),
            &model,
        );
        let text = chain
            .invoke_text(&Variables::new().with("topic", "bears"))
            .await
            .unwrap();
        assert_eq!(text, "Why do bears hibernate?");
        assert_eq!(
            model.requests()[0].last_user_content(),
            Some("Tell me a joke about bears")
        );
    }

    #[tokio::test]
    async fn missing_variable_skips_model_call() {
        let model = ScriptedModel::new().otherwise("unused");
        let chain = LlmChain::new(ChatPromptTemplate::from_template("{topic}"), &model);
        let err = chain.invoke(&Variables::new()).await.unwrap_err();
        assert!(matches!(err, Error::MissingVariable { .. }));
        assert_eq!(model.call_count(), 0);
    }
}
