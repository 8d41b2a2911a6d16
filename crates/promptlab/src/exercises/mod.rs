//! The seven runnable exercises behind the `promptlab` subcommands.
//!
//! Each exercise takes a `&dyn ChatModel` and a writer for its console
//! output, and returns a typed result so it can be driven end to end by
//! tests with a [`ScriptedModel`](crate::api::ScriptedModel).
//!
//! | Module | Subcommand | |
//! |--------|------------|-|
//! | [`messages`] | `messages` | Fixed multi-role conversation |
//! | [`templates`] | `templates` | Single-template joke |
//! | [`chain`] | `chain` | Interactive name/location collection |
//! | [`sequential`] | `sequential` | Dish, then recipe |
//! | [`memory`] | `memory` | Raw-history conversation |
//! | [`summary`] | `summary` | Rolling-summary conversation |
//! | [`tools`] | `tools` | Calculator tool and agent |

pub mod chain;
pub mod memory;
pub mod messages;
pub mod sequential;
pub mod summary;
pub mod templates;
pub mod tools;

use crate::Result;
use crate::api::ChatModel;
use crate::chain::ConversationChain;
use crate::memory::ConversationMemory;
use std::io::Write;

/// Scripted user turns shared by the two memory exercises.
pub const USER_MESSAGES: [&str; 4] = [
    "My name is Alice and I'm from New York.",
    "What do you know about me?",
    "Tell me about my city.",
    "Can you remind me what we've discussed?",
];

/// Play [`USER_MESSAGES`] through a [`ConversationChain`] backed by
/// `memory`, printing each exchange. Returns the assistant replies.
pub async fn run_conversation(
    model: &dyn ChatModel,
    memory: &mut dyn ConversationMemory,
    out: &mut dyn Write,
) -> Result<Vec<String>> {
    let chain = ConversationChain::new(model);
    let mut replies = Vec::with_capacity(USER_MESSAGES.len());

    writeln!(out, "Conversational Memory Demonstration:")?;
    for input in USER_MESSAGES {
        writeln!(out, "User: {input}")?;
        let reply = chain.predict(memory, input).await?;
        writeln!(out, "Assistant: {}", reply.content())?;
        replies.push(reply.into_content());
    }
    Ok(replies)
}
