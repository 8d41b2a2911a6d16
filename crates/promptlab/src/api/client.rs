//! HTTP client for OpenAI-compatible chat completions.

use super::model::{ChatModel, ModelFuture};
use crate::config::{ClientConfig, ModelConfig};
use crate::{ChatCompletion, ChatRequest, Error, Result, ToolCall, UsageInfo};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, trace};

// ── Raw response types ─────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

#[derive(Deserialize, Debug)]
struct RawErrorBody {
    error: ApiErrorResponse,
}

/// Turn an HTTP status and body into a [`ChatCompletion`].
///
/// Non-2xx statuses and bodies carrying an `error` object become
/// [`Error::Api`]. A 2xx body with no choices is an empty completion.
pub fn parse_chat_response(status: u16, body: &str) -> Result<ChatCompletion> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<RawErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(Error::Api { status, message });
    }

    let parsed: RawChatResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    if let Some(err) = parsed.error {
        return Err(Error::Api {
            status,
            message: err.message,
        });
    }

    let choice = parsed.choices.and_then(|c| c.into_iter().next());
    Ok(match choice {
        Some(c) => ChatCompletion {
            content: c.message.content,
            tool_calls: c.message.tool_calls.unwrap_or_default(),
            usage: parsed.usage,
            finish_reason: c.finish_reason,
        },
        None => ChatCompletion {
            usage: parsed.usage,
            ..Default::default()
        },
    })
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for an OpenAI-compatible chat completions API.
///
/// Construction never touches the network and never fails for a missing
/// key; the credential is checked when the first request is sent.
pub struct OpenAiClient {
    http: reqwest::Client,
    client_config: ClientConfig,
    model_config: ModelConfig,
}

impl OpenAiClient {
    pub fn new(client_config: ClientConfig, model_config: ModelConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("promptlab/0.1");
        if let Some(timeout) = client_config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            client_config,
            model_config,
        })
    }

    /// Client configured from `OPENAI_API_KEY` / `OPENAI_BASE_URL`.
    pub fn from_env(model_config: ModelConfig) -> Result<Self> {
        Self::new(ClientConfig::from_env(), model_config)
    }

    async fn send(&self, body: &ChatRequest) -> Result<ChatCompletion> {
        let api_key =
            self.client_config
                .api_key
                .as_deref()
                .ok_or_else(|| Error::MissingCredential {
                    env_var: self.client_config.api_key_env.clone(),
                })?;

        debug!(
            "LLM request: model={}, messages={}, tools={}, temp={:?}",
            body.model,
            body.messages.len(),
            body.tools.as_ref().map_or(0, |t| t.len()),
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();
        let resp = self
            .http
            .post(self.client_config.completions_url())
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        let completion = parse_chat_response(status.as_u16(), &text)?;
        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }
        debug!(
            "LLM output: {} chars text, {} tool call(s)",
            completion.content.as_ref().map_or(0, |s| s.len()),
            completion.tool_calls.len()
        );
        Ok(completion)
    }
}

impl ChatModel for OpenAiClient {
    fn config(&self) -> &ModelConfig {
        &self.model_config
    }

    fn chat<'a>(&'a self, request: &'a ChatRequest) -> ModelFuture<'a, ChatCompletion> {
        Box::pin(self.send(request))
    }
}
