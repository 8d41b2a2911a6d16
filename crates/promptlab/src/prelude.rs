//! Convenience re-exports for common `promptlab` types.
//!
//! ```ignore
//! use promptlab::prelude::*;
//! ```
//!
//! Covers messages, templates, the model trait and its implementations,
//! chains, memory, tools, and the agent. Wire-level types (`ApiMessage`,
//! `ToolCall`) and the expression evaluator are left to their modules.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{Error, Message, Result, Role, ToolDef, json_schema_for};

// ── Model ───────────────────────────────────────────────────────────
pub use crate::api::{ChatModel, OpenAiClient, Reply, ScriptedModel};
pub use crate::config::{ClientConfig, ModelConfig};

// ── Prompts and chains ──────────────────────────────────────────────
pub use crate::chain::{ConversationChain, LlmChain, SequentialChain, SequentialOutput};
pub use crate::prompt::{ChatPromptTemplate, PromptTemplate, Variables};

// ── Memory ──────────────────────────────────────────────────────────
pub use crate::memory::{ChatHistory, ConversationMemory, SummaryMemory};

// ── Tools and agent ─────────────────────────────────────────────────
pub use crate::agent::{
    AgentConfig, AgentEvent, AgentExecutor, AgentOutcome, CompositeEventHandler, EventHandler,
    FnEventHandler, LoggingHandler, NoopHandler,
};
pub use crate::tools::{FnTool, Tool, ToolFuture, ToolSet, calculator_tool, parse_tool_args};
