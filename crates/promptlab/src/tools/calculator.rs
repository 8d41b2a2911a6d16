//! The `Calculator` tool.

use super::core::FnTool;
use super::math;
use crate::{ToolDef, json_schema_for};
use schemars::JsonSchema;
use serde::Deserialize;

/// Tool name as advertised to the model.
pub const CALCULATOR_NAME: &str = "Calculator";

/// Typed arguments for `Calculator`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CalculatorArgs {
    /// Mathematical expression to evaluate.
    pub expression: String,
}

pub fn calculator_definition() -> ToolDef {
    ToolDef::new(
        CALCULATOR_NAME,
        "Performs mathematical calculations. Input: a mathematical expression \
         as a string, e.g. '2^8 + sqrt(81)'. Supports + - * / ^, % (modulo \
         between operands, percent when trailing, e.g. '45% * 890'), \
         postfix ! (factorial), parentheses, constants pi, e, tau, and the \
         functions sqrt, cbrt, abs, exp, ln, log(x[, base]), log10, log2, \
         sin, cos, tan, asin, acos, atan, sinh, cosh, tanh, floor, ceil, \
         round, min, max, pow.",
        json_schema_for::<CalculatorArgs>(),
    )
}

/// Evaluate an expression to its display string, or `"Error: ..."`.
///
/// ```
/// use promptlab::tools::calculator::evaluate;
///
/// assert_eq!(evaluate("2 + 2"), "4");
/// assert_eq!(evaluate("sqrt(16) * 3"), "12");
/// assert!(evaluate("not an expression").starts_with("Error:"));
/// ```
pub fn evaluate(expression: &str) -> String {
    match math::eval(expression) {
        Ok(value) => math::format_number(value),
        Err(e) => format!("Error: {e}"),
    }
}

/// The calculator as a registrable [`Tool`](super::Tool).
pub fn calculator_tool() -> FnTool {
    FnTool::new(calculator_definition(), |args: CalculatorArgs| async move {
        evaluate(&args.expression)
    })
}
