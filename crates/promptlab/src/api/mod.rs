//! Model boundary: the [`ChatModel`] trait and its implementations.
//!
//! - [`model`]: [`ChatModel`] with the raw [`chat`](ChatModel::chat) call
//!   and the message-level [`invoke`](ChatModel::invoke) helper.
//! - [`client`]: [`OpenAiClient`], the HTTP implementation for any
//!   OpenAI-compatible `/chat/completions` endpoint.
//! - [`stub`]: [`ScriptedModel`], a deterministic stand-in that answers
//!   from rules and records every request.
//!
//! Failures from this boundary are never retried; they propagate to the
//! caller.

pub mod client;
pub mod model;
pub mod stub;

pub use client::OpenAiClient;
pub use model::{ChatModel, ModelFuture};
pub use stub::{Reply, ScriptedModel};
