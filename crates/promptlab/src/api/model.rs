//! The [`ChatModel`] trait.

use crate::config::ModelConfig;
use crate::{ApiMessage, ChatCompletion, ChatRequest, Message, Result};
use futures::future::BoxFuture;
use tracing::debug;

/// Boxed future returned by model calls.
///
/// Keeps [`ChatModel`] dyn-compatible so chains and memories can hold a
/// `&dyn ChatModel`.
pub type ModelFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// A chat-completion backend.
///
/// Implementors provide [`config`](ChatModel::config) and the raw
/// [`chat`](ChatModel::chat) call; [`invoke`](ChatModel::invoke) is the
/// message-in, message-out helper most callers use.
pub trait ChatModel: Send + Sync {
    /// Model name and sampling parameters used to build requests.
    fn config(&self) -> &ModelConfig;

    /// Send one request and wait for the completion.
    fn chat<'a>(&'a self, request: &'a ChatRequest) -> ModelFuture<'a, ChatCompletion>;

    /// Send `messages` (without tools) and return the reply as an AI message.
    fn invoke<'a>(&'a self, messages: &'a [Message]) -> ModelFuture<'a, Message> {
        Box::pin(async move {
            let wire: Vec<ApiMessage> = messages.iter().map(ApiMessage::from).collect();
            let request = self.config().request(wire, None);
            let reply = self.chat(&request).await?.into_message()?;
            debug!("Model reply: {} chars", reply.content().len());
            Ok(reply)
        })
    }
}
