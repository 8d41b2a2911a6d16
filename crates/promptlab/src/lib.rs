//! Prompt templates, conversation memory, and tool calling on top of an
//! OpenAI-compatible chat completions API.
//!
//! `promptlab` is organised around a handful of small pieces that the
//! exercises in [`exercises`] compose:
//!
//! - [`Message`]: a role-tagged unit of text (system / human / AI).
//! - [`prompt`]: [`PromptTemplate`](prompt::PromptTemplate) and
//!   [`ChatPromptTemplate`](prompt::ChatPromptTemplate) render `{name}`
//!   placeholders from a [`Variables`](prompt::Variables) mapping.
//! - [`api`]: the [`ChatModel`](api::ChatModel) trait, the HTTP
//!   [`OpenAiClient`](api::OpenAiClient), and the deterministic
//!   [`ScriptedModel`](api::ScriptedModel) used by tests.
//! - [`chain`]: [`LlmChain`](chain::LlmChain) (prompt + model),
//!   [`SequentialChain`](chain::SequentialChain) (output of one chain feeds
//!   the next), and [`ConversationChain`](chain::ConversationChain).
//! - [`memory`]: raw [`ChatHistory`](memory::ChatHistory) and rolling
//!   [`SummaryMemory`](memory::SummaryMemory).
//! - [`tools`] and [`agent`]: the [`Tool`](tools::Tool) trait, the
//!   `Calculator` tool, and the bounded tool-calling
//!   [`AgentExecutor`](agent::AgentExecutor).
//!
//! # Example
//!
//! ```ignore
//! use promptlab::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> promptlab::Result<()> {
//!     let client = OpenAiClient::from_env(ModelConfig::default())?;
//!     let prompt = ChatPromptTemplate::from_template("Tell me a joke about {topic}");
//!     let chain = LlmChain::new(prompt, &client);
//!     let joke = chain.invoke_text(&Variables::new().with("topic", "bears")).await?;
//!     println!("{joke}");
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod exercises;
pub mod memory;
pub mod message;
pub mod prelude;
pub mod prompt;
pub mod tools;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::{Error, Result};
pub use message::{Message, Role};

// Re-export schemars for tool argument structs.
pub use schemars;

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`. Bridges typed tool arguments and the
/// `parameters` object of the function-calling API.
///
/// # Example
///
/// ```
/// use promptlab::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct CalcArgs {
///     expression: String,
/// }
///
/// let schema = json_schema_for::<CalcArgs>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"expression".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Unset optional fields are omitted.
#[derive(Serialize, Debug, Default, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDef>>,
}

impl ChatRequest {
    /// Content of the most recent `user` message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ApiRole::User)
            .and_then(|m| m.content.as_deref())
    }
}

// ── Wire message types ─────────────────────────────────────────────

/// Role of a message on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiRole {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for ApiRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiRole::System => write!(f, "system"),
            ApiRole::User => write!(f, "user"),
            ApiRole::Assistant => write!(f, "assistant"),
            ApiRole::Tool => write!(f, "tool"),
        }
    }
}

/// A message as sent to the API. Unlike [`Message`], this can carry tool
/// calls (assistant) or a tool result (tool).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ApiMessage {
    pub role: ApiRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ApiMessage {
    pub fn assistant_tool_calls(content: Option<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            role: ApiRole::Assistant,
            content,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ApiRole::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }
}

impl From<&Message> for ApiMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role() {
            Role::System => ApiRole::System,
            Role::Human => ApiRole::User,
            Role::Ai => ApiRole::Assistant,
        };
        Self {
            role,
            content: Some(message.content().to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

// ── Tool types ─────────────────────────────────────────────────────

/// The type of a tool definition. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// Tool definition sent to the API (OpenAI function-calling format).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ToolDef {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: FunctionDef,
}

impl ToolDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: ToolType::Function,
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// The type of a tool call. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CallType {
    #[serde(rename = "function")]
    Function,
}

/// A tool call returned by the model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub function: FunctionCallData,
}

impl ToolCall {
    /// Build a function call with raw JSON `arguments`.
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: CallType::Function,
            function: FunctionCallData {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FunctionCallData {
    pub name: String,
    pub arguments: String,
}

// ── Response types ─────────────────────────────────────────────────

/// Clean return type from [`ChatModel::chat`](api::ChatModel::chat).
#[derive(Debug, Clone, Default)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
}

impl ChatCompletion {
    /// A text-only completion.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: Some("stop".into()),
            ..Default::default()
        }
    }

    /// A completion that requests tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            finish_reason: Some("tool_calls".into()),
            ..Default::default()
        }
    }

    /// Convert a text completion into an AI [`Message`].
    ///
    /// Fails with [`Error::EmptyResponse`] when the model returned no text.
    pub fn into_message(self) -> Result<Message> {
        match self.content {
            Some(text) => Ok(Message::ai(text)),
            None => Err(Error::EmptyResponse),
        }
    }
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}
