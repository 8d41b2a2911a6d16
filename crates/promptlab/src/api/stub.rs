//! A deterministic, offline [`ChatModel`].
//!
//! [`ScriptedModel`] answers from a queue of one-shot replies first, then
//! from substring rules matched against the last user message, then from
//! an optional fallback. Every request is recorded so tests can assert on
//! exactly what was sent.
//!
//! ```ignore
//! let model = ScriptedModel::new()
//!     .when("classic dish from", "Lasagna")
//!     .when("make Lasagna", "Layer pasta, ragu, and bechamel. Bake.");
//! ```

use super::model::{ChatModel, ModelFuture};
use crate::config::ModelConfig;
use crate::{ChatCompletion, ChatRequest, Error, ToolCall};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A scripted response.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Plain assistant text.
    Text(String),
    /// A request to call tools.
    ToolCalls(Vec<ToolCall>),
    /// Fail the call with an API error carrying this message.
    Fail(String),
}

impl Reply {
    fn into_completion(self) -> crate::Result<ChatCompletion> {
        match self {
            Reply::Text(text) => Ok(ChatCompletion::text(text)),
            Reply::ToolCalls(calls) => Ok(ChatCompletion::tool_calls(calls)),
            Reply::Fail(message) => Err(Error::Api {
                status: 503,
                message,
            }),
        }
    }
}

#[derive(Debug)]
struct Rule {
    needle: String,
    reply: Reply,
}

/// Rule-driven stand-in for a remote model.
#[derive(Debug)]
pub struct ScriptedModel {
    config: ModelConfig,
    rules: Vec<Rule>,
    fallback: Option<Reply>,
    queue: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            config: ModelConfig::new("scripted"),
            rules: Vec::new(),
            fallback: None,
            queue: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Answer `text` whenever the last user message contains `needle`.
    pub fn when(self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.when_reply(needle, Reply::Text(text.into()))
    }

    /// Like [`when`](Self::when) with an arbitrary [`Reply`].
    pub fn when_reply(mut self, needle: impl Into<String>, reply: Reply) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply,
        });
        self
    }

    /// Queue a one-shot reply. Queued replies are consumed in order before
    /// any rule is consulted.
    pub fn then(self, reply: Reply) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    /// Reply used when nothing else matches.
    pub fn otherwise(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(Reply::Text(text.into()));
        self
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn reply_for(&self, request: &ChatRequest) -> Option<Reply> {
        if let Some(reply) = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Some(reply);
        }
        let prompt = request.last_user_content().unwrap_or_default();
        self.rules
            .iter()
            .find(|r| prompt.contains(&r.needle))
            .map(|r| r.reply.clone())
            .or_else(|| self.fallback.clone())
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatModel for ScriptedModel {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn chat<'a>(&'a self, request: &'a ChatRequest) -> ModelFuture<'a, ChatCompletion> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        let reply = self.reply_for(request);
        Box::pin(async move {
            match reply {
                Some(reply) => reply.into_completion(),
                None => Err(Error::InvalidResponse(format!(
                    "no scripted reply for: {}",
                    request.last_user_content().unwrap_or("(no user message)")
                ))),
            }
        })
    }
}
