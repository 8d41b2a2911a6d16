//! Events, handlers, and run results for the
//! [`AgentExecutor`](super::executor::AgentExecutor).
//!
//! The executor reports progress through [`AgentEvent`] variants, from round
//! start through tool execution to completion. Callers implement
//! [`EventHandler`] to observe them.
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopHandler`] | Tests or fire-and-forget runs |
//! | [`LoggingHandler`] | Structured logging via `tracing` |
//! | [`FnEventHandler`] | Quick closures for simple callbacks |
//! | [`CompositeEventHandler`] | Compose multiple handlers in order |

use crate::ApiMessage;
use tracing::{debug, info, warn};

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted by the executor during a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent<'a> {
    /// A model call is about to be made.
    RoundStart { round: u32, max_rounds: u32 },
    /// The model returned text (final answer, or alongside tool calls).
    Text(&'a str),
    /// The model requested tool calls this round.
    ToolCallsReceived { round: u32, count: usize },
    /// A single tool is about to run.
    ToolExecuting { name: &'a str, arguments: &'a str },
    /// A single tool finished.
    ToolResult {
        name: &'a str,
        call_id: &'a str,
        result: &'a str,
    },
    /// Token usage reported by the API for this round.
    TokenUsage {
        prompt_tokens: u32,
        completion_tokens: u32,
    },
    /// The model answered without requesting tools.
    Finished,
    /// The round limit was reached before a final answer.
    RoundLimitReached { max_rounds: u32 },
}

impl AgentEvent<'_> {
    /// Total tokens for a `TokenUsage` event, `None` for all others.
    pub fn total_tokens(&self) -> Option<u64> {
        if let AgentEvent::TokenUsage {
            prompt_tokens,
            completion_tokens,
        } = self
        {
            Some(u64::from(*prompt_tokens) + u64::from(*completion_tokens))
        } else {
            None
        }
    }
}

/// Observer for executor events.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &AgentEvent<'_>) {
        let _ = event;
    }
}

/// Ignores every event.
pub struct NoopHandler;
impl EventHandler for NoopHandler {}

/// An event handler backed by a closure.
///
/// ```ignore
/// let handler = FnEventHandler::new(|event| {
///     if let AgentEvent::ToolResult { name, result, .. } = event {
///         println!("{name} -> {result}");
///     }
/// });
/// ```
pub struct FnEventHandler<F>(F)
where
    F: Fn(&AgentEvent<'_>) + Send + Sync;

impl<F> FnEventHandler<F>
where
    F: Fn(&AgentEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EventHandler for FnEventHandler<F>
where
    F: Fn(&AgentEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &AgentEvent<'_>) {
        (self.0)(event)
    }
}

/// Dispatches every event to each inner handler in registration order.
///
/// ```ignore
/// let handler = CompositeEventHandler::new()
///     .with(LoggingHandler)
///     .with_if(show_tools, printer);
/// ```
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn with(mut self, handler: impl EventHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Add `handler` only when `condition` holds.
    pub fn with_if(self, condition: bool, handler: impl EventHandler + 'static) -> Self {
        if condition { self.with(handler) } else { self }
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CompositeEventHandler {
    fn on_event(&self, event: &AgentEvent<'_>) {
        for handler in &self.handlers {
            handler.on_event(event);
        }
    }
}

/// Logs events via `tracing`.
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&self, event: &AgentEvent<'_>) {
        match event {
            AgentEvent::RoundStart { round, max_rounds } => {
                debug!("[round {round}/{max_rounds}]");
            }
            AgentEvent::Text(text) => {
                let preview: String = text.chars().take(200).collect();
                debug!(
                    "LLM text: {preview}{}",
                    if text.chars().count() > 200 { "..." } else { "" }
                );
            }
            AgentEvent::ToolCallsReceived { round, count } => {
                debug!("{count} tool call(s) in round {round}");
            }
            AgentEvent::ToolExecuting { name, .. } => {
                debug!("Executing tool: {name}");
            }
            AgentEvent::ToolResult { name, result, .. } => {
                info!("Tool {name} returned: {result}");
            }
            AgentEvent::TokenUsage {
                prompt_tokens,
                completion_tokens,
            } => {
                debug!(
                    "Tokens: prompt={prompt_tokens}, completion={completion_tokens}, total={}",
                    event.total_tokens().unwrap_or_default()
                );
            }
            AgentEvent::Finished => {
                info!("Agent finished (no more tool calls)");
            }
            AgentEvent::RoundLimitReached { max_rounds } => {
                warn!("Agent hit round limit ({max_rounds})");
            }
        }
    }
}

// ── Run result ─────────────────────────────────────────────────────

/// The result of one [`AgentExecutor::invoke`](super::executor::AgentExecutor::invoke).
///
/// [`finished`](AgentOutcome::finished) tells a natural answer apart from a
/// stop at the round limit.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// Final answer text, or the round-limit message.
    pub output: String,
    /// Whether the model answered without requesting more tools.
    pub finished: bool,
    /// Model calls made.
    pub rounds_used: u32,
    /// Tool invocations executed.
    pub tool_calls: usize,
    /// Every message sent or received, including tool results.
    pub messages: Vec<ApiMessage>,
    pub total_prompt_tokens: u32,
    pub total_completion_tokens: u32,
}

impl AgentOutcome {
    /// Total tokens (prompt + completion).
    pub fn total_tokens(&self) -> u32 {
        self.total_prompt_tokens + self.total_completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn total_tokens_only_for_usage_events() {
        let usage = AgentEvent::TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        };
        assert_eq!(usage.total_tokens(), Some(15));
        assert_eq!(AgentEvent::Finished.total_tokens(), None);
    }

    #[test]
    fn composite_dispatches_to_all_handlers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = seen.clone();
        let b = seen.clone();
        let handler = CompositeEventHandler::new()
            .with(FnEventHandler::new(move |e: &AgentEvent<'_>| {
                a.lock().unwrap().push(format!("a:{e:?}"));
            }))
            .with_if(false, NoopHandler)
            .with(FnEventHandler::new(move |_: &AgentEvent<'_>| {
                b.lock().unwrap().push("b".to_string());
            }))
            .with(LoggingHandler);

        handler.on_event(&AgentEvent::Finished);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], "a:Finished");
        assert_eq!(seen[1], "b");
    }
}
