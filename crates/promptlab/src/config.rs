//! Model and client configuration.
//!
//! [`ModelConfig`] holds the per-request knobs (model name, temperature,
//! token limit) and turns message lists into [`ChatRequest`]s.
//! [`ClientConfig`] holds the transport settings for
//! [`OpenAiClient`](crate::api::OpenAiClient): endpoint, credential, and
//! timeout.
//!
//! ```ignore
//! let model = ModelConfig::new("gpt-4o-mini").with_temperature(0.0);
//! let client = ClientConfig::from_env().with_timeout(Duration::from_secs(60));
//! ```

use crate::{ApiMessage, ChatRequest, ToolDef};
use std::fmt;
use std::time::Duration;

/// Default model for all exercises.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API base URL (OpenAI-compatible).
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Model selection and sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Model identifier (e.g. `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature. `None` leaves the provider default.
    pub temperature: Option<f32>,
    /// Maximum tokens per response. `None` leaves the provider default.
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build a request body for `messages`, optionally advertising `tools`.
    ///
    /// An empty tool list is sent as no tools at all.
    pub fn request(&self, messages: Vec<ApiMessage>, tools: Option<Vec<ToolDef>>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: tools.filter(|t| !t.is_empty()),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Transport settings for the HTTP client.
///
/// `Debug` output never includes the API key itself.
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// API key. Absence is reported on the first request, not here.
    pub api_key: Option<String>,
    /// Name of the variable the key was expected in (for error messages).
    pub api_key_env: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_env: API_KEY_ENV.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read the credential from `OPENAI_API_KEY` and the optional base URL
    /// override from `OPENAI_BASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            ..Self::default()
        };
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            config.base_url = url;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn model_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.temperature.is_none());
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn model_builder_methods() {
        let config = ModelConfig::new("other")
            .with_temperature(0.0)
            .with_max_tokens(256);
        assert_eq!(config.model, "other");
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.max_tokens, Some(256));
    }

    #[test]
    fn request_drops_empty_tool_list() {
        let config = ModelConfig::default().with_temperature(0.5);
        let req = config.request(vec![(&Message::human("hi")).into()], Some(vec![]));
        assert!(req.tools.is_none());
        assert_eq!(req.temperature, Some(0.5));
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn completions_url_joins_cleanly() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            ClientConfig::default().completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn client_defaults_have_no_key_or_timeout() {
        let config = ClientConfig::default();
        assert!(config.api_key.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ClientConfig::default().with_api_key("sk-secret-123");
        let shown = format!("{config:?}");
        assert!(!shown.contains("sk-secret-123"));
        assert!(shown.contains("api_key: Some(\"<redacted>\")"));
        assert!(shown.contains("OPENAI_API_KEY"));

        let shown = format!("{:?}", ClientConfig::default());
        assert!(shown.contains("api_key: None"));
    }
}
