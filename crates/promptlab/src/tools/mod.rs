//! Tools for function-calling agents.
//!
//! Every capability the model can invoke is a [`Tool`] implementor. Tools
//! are collected into a [`ToolSet`] which handles dispatch by exact name,
//! JSON Schema argument validation, and result truncation.
//!
//! - [`core`]: [`Tool`] trait, [`ToolSet`], the closure-based [`FnTool`].
//! - [`calculator`]: the `Calculator` tool.
//! - [`math`]: the expression evaluator behind it.

pub mod calculator;
pub mod core;
pub mod math;

pub use calculator::{CALCULATOR_NAME, CalculatorArgs, calculator_tool, evaluate};
pub use core::{
    DEFAULT_MAX_RESULT_BYTES, FnTool, Tool, ToolFuture, ToolSet, parse_tool_args,
    truncate_result, validate_tool_arguments,
};
