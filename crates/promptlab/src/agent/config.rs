//! Configuration for the [`AgentExecutor`](super::executor::AgentExecutor).
//!
//! ```ignore
//! let config = AgentConfig::new("You are a math expert assistant.").with_max_rounds(5);
//! ```

/// Model calls allowed per query before the loop gives up.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// System prompt for the calculator agent.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a math expert assistant. Use tools for all calculations.";

/// Output reported when the round limit is reached.
pub const MAX_ITERATIONS_MESSAGE: &str = "Agent stopped due to max iterations.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// System message sent before the user query.
    pub system_prompt: String,
    /// Maximum model calls per query.
    pub max_rounds: u32,
}

impl AgentConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.max_rounds, 10);
        assert!(config.system_prompt.contains("Use tools"));
    }

    #[test]
    fn builder_overrides_rounds() {
        let config = AgentConfig::new("p").with_max_rounds(3);
        assert_eq!(config.system_prompt, "p");
        assert_eq!(config.max_rounds, 3);
    }
}
