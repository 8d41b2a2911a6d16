//! Tool-calling agent.
//!
//! - [`executor::AgentExecutor`]: the bounded loop: ask the model, run the
//!   tools it requests, feed results back, stop at a text answer or the
//!   round limit.
//! - [`config::AgentConfig`]: system prompt and round limit.
//! - [`events`]: [`EventHandler`] and [`AgentEvent`] for observing the
//!   loop, plus [`AgentOutcome`].

pub mod config;
pub mod events;
pub mod executor;

pub use config::{AgentConfig, DEFAULT_MAX_ROUNDS, MAX_ITERATIONS_MESSAGE};
pub use events::{
    AgentEvent, AgentOutcome, CompositeEventHandler, EventHandler, FnEventHandler,
    LoggingHandler, NoopHandler,
};
pub use executor::AgentExecutor;
