use super::LlmChain;
use crate::prompt::Variables;
use crate::{Message, Result};
use tracing::{debug, info};

/// Result of a [`SequentialChain`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialOutput {
    /// Text produced by the first chain, exactly as returned.
    pub intermediate: String,
    /// Reply from the second chain.
    pub output: Message,
}

/// Two chains run back to back. The first chain's reply text is bound to
/// `bind_as` in the variables given to the second.
#[derive(Debug, Clone)]
pub struct SequentialChain<'a> {
    first: LlmChain<'a>,
    bind_as: String,
    second: LlmChain<'a>,
}

impl<'a> SequentialChain<'a> {
    pub fn new(first: LlmChain<'a>, bind_as: impl Into<String>, second: LlmChain<'a>) -> Self {
        Self {
            first,
            bind_as: bind_as.into(),
            second,
        }
    }

    /// Run both stages. If the first stage fails the second never runs.
    ///
    /// `vars` is also visible to the second stage; a variable named
    /// `bind_as` is overwritten by the first stage's output.
    pub async fn invoke(&self, vars: &Variables) -> Result<SequentialOutput> {
        let intermediate = self.first.invoke_text(vars).await?;
        info!("Stage 1 produced {} = {:?}", self.bind_as, intermediate);

        let mut next = vars.clone();
        next.insert(self.bind_as.as_str(), intermediate.as_str());
        let output = self.second.invoke(&next).await?;
        debug!("Stage 2 produced {} chars", output.content().len());

        Ok(SequentialOutput {
            intermediate,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Reply, ScriptedModel};
    use crate::prompt::ChatPromptTemplate;

    fn chains(model: &ScriptedModel) -> SequentialChain<'_> {
        SequentialChain::new(
            LlmChain::new(
                ChatPromptTemplate::from_template("Name a dish from {location}."),
                model,
            ),
            "meal",
            LlmChain::new(
                ChatPromptTemplate::from_template("Recipe for {meal}?"),
                model,
            ),
        )
    }

    #[tokio::test]
    async fn first_output_feeds_second_prompt_verbatim() {
        let model = ScriptedModel::new()
            .when("dish from Japan", " Ramen ")
            .when("Recipe for", "Boil noodles.");
        let out = chains(&model)
            .invoke(&Variables::new().with("location", "Japan"))
            .await
            .unwrap();
        assert_eq!(out.intermediate, " Ramen ");
        assert_eq!(out.output.content(), "Boil noodles.");
        assert_eq!(
            model.requests()[1].last_user_content(),
            Some("Recipe for  Ramen ?")
        );
    }

    #[tokio::test]
    async fn first_failure_stops_pipeline() {
        let model = ScriptedModel::new()
            .then(Reply::Fail("down".into()))
            .otherwise("never");
        let err = chains(&model)
            .invoke(&Variables::new().with("location", "Peru"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Api { .. }));
        assert_eq!(model.call_count(), 1);
    }
}
