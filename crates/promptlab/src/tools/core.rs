//! Tool abstraction for function-calling agents.
//!
//! The [`Tool`] trait defines the interface every tool implements: a static
//! API definition (name, description, JSON schema) and an async `execute`
//! method. Tools are collected into a [`ToolSet`] which handles dispatch,
//! argument validation, definition export, and result truncation.

use crate::{Error, Result, ToolDef};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, trace};

/// Maximum size (in bytes) for tool output before truncation.
pub const DEFAULT_MAX_RESULT_BYTES: usize = 30_000;

/// Boxed future returned by [`Tool::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

// ── Tool trait ─────────────────────────────────────────────────────

/// A tool the model can invoke via function calling.
///
/// # Example
///
/// ```ignore
/// struct Echo;
///
/// impl Tool for Echo {
///     fn definition(&self) -> ToolDef { /* ... */ }
///
///     fn execute(&self, arguments: &str) -> ToolFuture<'_> {
///         let arguments = arguments.to_string();
///         Box::pin(async move { arguments })
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The tool definition sent to the API.
    fn definition(&self) -> ToolDef;

    /// Execute the tool with the raw JSON arguments string.
    ///
    /// Failures are returned as `"Error: ..."` strings rather than panicking;
    /// the agent passes the string back to the model as the tool result.
    fn execute(&self, arguments: &str) -> ToolFuture<'_>;

    fn name(&self) -> String {
        self.definition().function.name
    }
}

// ── ToolSet ────────────────────────────────────────────────────────

/// A collection of tools dispatched by exact name.
///
/// ```ignore
/// let tools = ToolSet::new().with(calculator_tool());
/// let defs = tools.definitions();
/// let result = tools.execute("Calculator", r#"{"expression":"2+2"}"#).await?;
/// ```
pub struct ToolSet {
    tools: BTreeMap<String, Box<dyn Tool>>,
    max_result_bytes: usize,
    /// Validate arguments against each tool's JSON Schema before execution.
    validate_args: bool,
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("max_result_bytes", &self.max_result_bytes)
            .field("validate_args", &self.validate_args)
            .finish()
    }
}

impl ToolSet {
    /// Create an empty tool set with argument validation enabled.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            max_result_bytes: DEFAULT_MAX_RESULT_BYTES,
            validate_args: true,
        }
    }

    pub fn with_max_result_bytes(mut self, max: usize) -> Self {
        self.max_result_bytes = max;
        self
    }

    pub fn with_arg_validation(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    /// Register a tool (builder pattern).
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// All tool definitions, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by exact name.
    ///
    /// An unregistered name is an [`Error::UnknownTool`]. Everything the
    /// tool itself reports, including argument validation failures, comes
    /// back as `Ok` with an `"Error: ..."` string for the model to read.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self.tools.get(name).ok_or_else(|| Error::UnknownTool {
            name: name.to_string(),
        })?;

        if self.validate_args
            && let Some(error) = validate_tool_arguments(tool.as_ref(), arguments)
        {
            debug!("Tool {name} rejected arguments");
            return Ok(error);
        }

        log_tool_call(name, arguments);
        let start = std::time::Instant::now();
        let result = tool.execute(arguments).await;
        debug!(
            "Tool {name} completed in {:.0}ms ({} bytes)",
            start.elapsed().as_secs_f64() * 1000.0,
            result.len()
        );
        trace!("Tool {name} result: {result}");

        Ok(truncate_result(result, self.max_result_bytes))
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── FnTool ─────────────────────────────────────────────────────────

/// Type-erased async handler for [`FnTool`].
type ErasedToolHandler =
    Box<dyn Fn(String) -> Pin<Box<dyn Future<Output = String> + Send>> + Send + Sync>;

/// A closure-based tool with typed arguments.
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// struct EchoArgs {
///     /// Text to echo back.
///     text: String,
/// }
///
/// let tool = FnTool::new(
///     ToolDef::new("echo", "Echo the input", json_schema_for::<EchoArgs>()),
///     |args: EchoArgs| async move { args.text },
/// );
/// ```
pub struct FnTool {
    def: ToolDef,
    handler: ErasedToolHandler,
}

impl FnTool {
    /// The handler receives arguments of type `A` deserialized from the raw
    /// JSON string. Parse failures are reported to the model without
    /// calling the handler.
    pub fn new<A, F, Fut>(def: ToolDef, handler: F) -> Self
    where
        A: serde::de::DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = String> + Send + 'static,
    {
        let erased = move |raw: String| -> Pin<Box<dyn Future<Output = String> + Send>> {
            match parse_tool_args::<A>(&raw) {
                Ok(args) => Box::pin(handler(args)),
                Err(e) => Box::pin(async move { e }),
            }
        };

        Self {
            def,
            handler: Box::new(erased),
        }
    }
}

impl Tool for FnTool {
    fn definition(&self) -> ToolDef {
        self.def.clone()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        (self.handler)(arguments.to_string())
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.def.function.name)
            .finish()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Validate tool arguments against the tool's declared JSON Schema.
///
/// Returns `None` if valid, or `Some(error_string)` formatted for the model
/// to read and correct.
pub fn validate_tool_arguments(tool: &dyn Tool, arguments: &str) -> Option<String> {
    let args_value: serde_json::Value = match serde_json::from_str(arguments) {
        Ok(v) => v,
        Err(e) => {
            return Some(format!(
                "Error: invalid JSON arguments for tool '{}': {e}. \
                 Please provide valid JSON matching the tool's parameter schema.",
                tool.name()
            ));
        }
    };

    let schema = tool.definition().function.parameters;

    // An invalid schema skips validation.
    let validator = jsonschema::validator_for(&schema).ok()?;

    let errors: Vec<String> = validator
        .iter_errors(&args_value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(format!(
            "Error: argument validation failed for tool '{}':\n{}\n\
             Please fix the arguments and try again.",
            tool.name(),
            errors.join("\n")
        ))
    }
}

/// Log a tool call at INFO level with a truncated preview of arguments.
pub fn log_tool_call(name: &str, arguments: &str) {
    let args_preview: String = arguments.chars().take(120).collect();
    info!(
        "[tool] {}({args_preview}{})",
        name,
        if arguments.chars().count() > 120 { "..." } else { "" }
    );
    trace!("[tool] {name} arguments: {arguments}");
}

/// Truncate a string to at most `max` bytes on a char boundary, appending
/// a notice if trimmed.
pub fn truncate_result(s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut kept = String::with_capacity(max);
    for ch in s.chars() {
        if kept.len() + ch.len_utf8() > max {
            break;
        }
        kept.push(ch);
    }
    format!("{kept}...\n[truncated: {} bytes total]", s.len())
}

/// Parse raw JSON arguments into a typed struct.
///
/// The error string can be returned directly from [`Tool::execute`].
pub fn parse_tool_args<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T, String> {
    serde_json::from_str(arguments).map_err(|e| {
        format!(
            "Error: invalid tool arguments: {e}. \
             Please provide valid JSON matching the tool's parameter schema."
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_schema_for;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct EchoArgs {
        text: String,
    }

    fn echo_tool() -> FnTool {
        FnTool::new(
            ToolDef::new("echo", "Echo the input", json_schema_for::<EchoArgs>()),
            |args: EchoArgs| async move { args.text },
        )
    }

    #[tokio::test]
    async fn dispatches_by_exact_name() {
        let tools = ToolSet::new().with(echo_tool());
        let out = tools.execute("echo", r#"{"text":"hi"}"#).await.unwrap();
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let tools = ToolSet::new().with(echo_tool());
        let err = tools.execute("Echo", "{}").await.unwrap_err();
        match err {
            Error::UnknownTool { name } => assert_eq!(name, "Echo"),
            other => panic!("expected UnknownTool, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn schema_violation_is_returned_as_text() {
        let tools = ToolSet::new().with(echo_tool());
        let out = tools.execute("echo", r#"{"text": 5}"#).await.unwrap();
        assert!(out.starts_with("Error: argument validation failed for tool 'echo'"));

        let out = tools.execute("echo", "not json").await.unwrap();
        assert!(out.starts_with("Error: invalid JSON arguments"));
    }

    #[tokio::test]
    async fn fn_tool_reports_parse_errors_without_validation() {
        let tools = ToolSet::new().with_arg_validation(false).with(echo_tool());
        let out = tools.execute("echo", "{}").await.unwrap();
        assert!(out.starts_with("Error: invalid tool arguments"));
    }

    #[tokio::test]
    async fn long_results_are_truncated() {
        let tools = ToolSet::new().with_max_result_bytes(5).with(echo_tool());
        let out = tools
            .execute("echo", r#"{"text":"abcdefghij"}"#)
            .await
            .unwrap();
        assert!(out.starts_with("abcde...\n[truncated: 10 bytes total]"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let out = truncate_result("ééé".to_string(), 3);
        assert!(out.starts_with("é..."));
        assert_eq!(truncate_result("short".into(), 10), "short");
    }

    #[test]
    fn definitions_are_sorted_by_name() {
        let tools = ToolSet::new()
            .with(FnTool::new(
                ToolDef::new("zeta", "", json_schema_for::<EchoArgs>()),
                |a: EchoArgs| async move { a.text },
            ))
            .with(echo_tool());
        let names: Vec<String> = tools
            .definitions()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(names, vec!["echo", "zeta"]);
        assert_eq!(tools.len(), 2);
    }
}
