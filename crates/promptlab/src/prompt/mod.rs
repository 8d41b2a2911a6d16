//! Prompt templates.
//!
//! - [`template`]: [`PromptTemplate`], one string with `{name}`
//!   placeholders, and the [`Variables`] mapping that fills them.
//! - [`chat`]: [`ChatPromptTemplate`], an ordered list of role-tagged
//!   message templates rendered into a `Vec<Message>`.

pub mod chat;
pub mod template;

pub use chat::ChatPromptTemplate;
pub use template::{PromptTemplate, Variables};
