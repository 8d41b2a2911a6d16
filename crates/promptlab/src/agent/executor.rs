//! The bounded tool-calling loop.
//!
//! Each query starts with the system prompt and the user's input. The model
//! either answers with text (done) or requests tool calls; every call is
//! dispatched through the [`ToolSet`], its result is appended as a `tool`
//! message, and the model is asked again. At most
//! [`max_rounds`](AgentConfig::max_rounds) model calls are made per query.

use super::config::{AgentConfig, MAX_ITERATIONS_MESSAGE};
use super::events::{AgentEvent, AgentOutcome, EventHandler, NoopHandler};
use crate::api::ChatModel;
use crate::tools::ToolSet;
use crate::{ApiMessage, Error, Message, Result, ToolCall};
use tracing::{info, warn};

/// Where the loop stands between steps.
#[derive(Debug)]
enum Step {
    AwaitingModel,
    ExecutingTools(Vec<ToolCall>),
    Done(String),
}

/// Runs queries against a model with a fixed tool set.
///
/// ```ignore
/// let tools = ToolSet::new().with(calculator_tool());
/// let agent = AgentExecutor::new(&client, &tools, AgentConfig::default());
/// let outcome = agent.invoke("What is 2^8 plus the square root of 81?").await?;
/// println!("{}", outcome.output);
/// ```
pub struct AgentExecutor<'a> {
    model: &'a dyn ChatModel,
    tools: &'a ToolSet,
    config: AgentConfig,
    event_handler: &'a dyn EventHandler,
}

impl<'a> AgentExecutor<'a> {
    pub fn new(model: &'a dyn ChatModel, tools: &'a ToolSet, config: AgentConfig) -> Self {
        Self {
            model,
            tools,
            config,
            event_handler: &NoopHandler,
        }
    }

    pub fn with_event_handler(mut self, handler: &'a dyn EventHandler) -> Self {
        self.event_handler = handler;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Answer one query.
    ///
    /// Model and transport failures propagate. A tool name the set does not
    /// contain is [`Error::UnknownTool`]. Hitting the round limit is not an
    /// error: the outcome has `finished == false` and the output
    /// `"Agent stopped due to max iterations."`.
    pub async fn invoke(&self, input: &str) -> Result<AgentOutcome> {
        let max_rounds = self.config.max_rounds;
        let tool_defs = self.tools.definitions();
        let mut outcome = AgentOutcome {
            output: String::new(),
            finished: false,
            rounds_used: 0,
            tool_calls: 0,
            messages: vec![
                ApiMessage::from(&Message::system(self.config.system_prompt.as_str())),
                ApiMessage::from(&Message::human(input)),
            ],
            total_prompt_tokens: 0,
            total_completion_tokens: 0,
        };
        info!(
            "Agent started: {} tool(s), max {max_rounds} round(s)",
            tool_defs.len()
        );

        let mut step = Step::AwaitingModel;
        loop {
            step = match step {
                Step::AwaitingModel => {
                    if outcome.rounds_used >= max_rounds {
                        warn!("Agent stopped after {max_rounds} round(s) without an answer");
                        self.event_handler
                            .on_event(&AgentEvent::RoundLimitReached { max_rounds });
                        outcome.output = MAX_ITERATIONS_MESSAGE.to_string();
                        return Ok(outcome);
                    }
                    outcome.rounds_used += 1;
                    self.event_handler.on_event(&AgentEvent::RoundStart {
                        round: outcome.rounds_used,
                        max_rounds,
                    });
                    self.call_model(&mut outcome, &tool_defs).await?
                }
                Step::ExecutingTools(calls) => {
                    self.execute_tools(&mut outcome, &calls).await?;
                    Step::AwaitingModel
                }
                Step::Done(text) => {
                    self.event_handler.on_event(&AgentEvent::Finished);
                    info!(
                        "Agent finished in {} round(s), {} tool call(s)",
                        outcome.rounds_used, outcome.tool_calls
                    );
                    outcome.finished = true;
                    outcome.output = text;
                    return Ok(outcome);
                }
            };
        }
    }

    async fn call_model(
        &self,
        outcome: &mut AgentOutcome,
        tool_defs: &[crate::ToolDef],
    ) -> Result<Step> {
        let request = self
            .model
            .config()
            .request(outcome.messages.clone(), Some(tool_defs.to_vec()));
        let completion = self.model.chat(&request).await?;

        if let Some(ref usage) = completion.usage {
            let prompt_tokens = usage.prompt_tokens.unwrap_or(0);
            let completion_tokens = usage.completion_tokens.unwrap_or(0);
            outcome.total_prompt_tokens += prompt_tokens;
            outcome.total_completion_tokens += completion_tokens;
            self.event_handler.on_event(&AgentEvent::TokenUsage {
                prompt_tokens,
                completion_tokens,
            });
        }
        if let Some(text) = completion.content.as_deref()
            && !text.is_empty()
        {
            self.event_handler.on_event(&AgentEvent::Text(text));
        }

        if completion.tool_calls.is_empty() {
            let text = completion.content.ok_or(Error::EmptyResponse)?;
            outcome.messages.push(ApiMessage::from(&Message::ai(text.as_str())));
            return Ok(Step::Done(text));
        }

        self.event_handler.on_event(&AgentEvent::ToolCallsReceived {
            round: outcome.rounds_used,
            count: completion.tool_calls.len(),
        });
        outcome.messages.push(ApiMessage::assistant_tool_calls(
            completion.content,
            completion.tool_calls.clone(),
        ));
        Ok(Step::ExecutingTools(completion.tool_calls))
    }

    async fn execute_tools(&self, outcome: &mut AgentOutcome, calls: &[ToolCall]) -> Result<()> {
        for call in calls {
            let name = call.function.name.as_str();
            let arguments = call.function.arguments.as_str();
            self.event_handler
                .on_event(&AgentEvent::ToolExecuting { name, arguments });

            let result = self.tools.execute(name, arguments).await?;

            self.event_handler.on_event(&AgentEvent::ToolResult {
                name,
                call_id: &call.id,
                result: &result,
            });
            outcome
                .messages
                .push(ApiMessage::tool_result(call.id.as_str(), result));
            outcome.tool_calls += 1;
        }
        Ok(())
    }
}

impl std::fmt::Debug for AgentExecutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentExecutor")
            .field("model", &self.model.config().model)
            .field("tools", self.tools)
            .field("config", &self.config)
            .finish()
    }
}
