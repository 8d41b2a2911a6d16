//! Chains: prompt templates bound to a model.
//!
//! - [`LlmChain`] renders a [`ChatPromptTemplate`](crate::prompt::ChatPromptTemplate),
//!   invokes the model, and returns the reply (or just its text).
//! - [`SequentialChain`] runs two chains where the first chain's output text
//!   becomes a variable of the second.
//! - [`ConversationChain`] renders history from a caller-owned
//!   [`ConversationMemory`](crate::memory::ConversationMemory) into each
//!   turn and records the turn afterwards.

pub mod conversation;
pub mod llm;
pub mod sequential;

pub use conversation::{CONVERSATION_PROMPT, ConversationChain};
pub use llm::LlmChain;
pub use sequential::{SequentialChain, SequentialOutput};
