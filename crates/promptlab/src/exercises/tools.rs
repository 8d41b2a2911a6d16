//! The calculator, first called directly, then through the agent loop.

use crate::Result;
use crate::agent::{AgentConfig, AgentExecutor, AgentOutcome, EventHandler};
use crate::api::ChatModel;
use crate::tools::{CALCULATOR_NAME, ToolSet, calculator_tool};
use std::io::Write;

/// Expressions evaluated without the model.
pub const TEST_CASES: [&str; 5] = [
    "2 + 2",
    "sqrt(16) * 3",
    "sin(pi/2) ^ 2",
    "log(e, 10)",
    "(15 * 3) + (27 / 3)",
];

/// Natural-language questions answered by the agent.
pub const QUERIES: [&str; 4] = [
    "What's the area of a circle with radius 5?",
    "Calculate 2^8 plus the square root of 81",
    "What is 45% of 890 plus 10 factorial?",
    "If I have 3^4 apples and eat 15, how many remain?",
];

#[derive(Debug, Clone)]
pub struct ToolsReport {
    /// `(expression, result)` for each direct evaluation.
    pub direct: Vec<(String, String)>,
    /// One outcome per query.
    pub answers: Vec<AgentOutcome>,
}

impl ToolsReport {
    /// Tokens spent across every agent query.
    pub fn total_tokens(&self) -> u32 {
        self.answers.iter().map(AgentOutcome::total_tokens).sum()
    }
}

pub async fn run(
    model: &dyn ChatModel,
    events: &dyn EventHandler,
    out: &mut dyn Write,
) -> Result<ToolsReport> {
    let tools = ToolSet::new().with(calculator_tool());

    writeln!(out, "=== Direct Tool Evaluation ===")?;
    let mut direct = Vec::with_capacity(TEST_CASES.len());
    for expr in TEST_CASES {
        let args = serde_json::json!({ "expression": expr }).to_string();
        let result = tools.execute(CALCULATOR_NAME, &args).await?;
        writeln!(out, "{expr:<20} => {result}")?;
        direct.push((expr.to_string(), result));
    }

    writeln!(out, "\n=== Agent-based Evaluation ===")?;
    let agent =
        AgentExecutor::new(model, &tools, AgentConfig::default()).with_event_handler(events);
    let mut answers = Vec::with_capacity(QUERIES.len());
    for query in QUERIES {
        let outcome = agent.invoke(query).await?;
        writeln!(out, "Q: {query}")?;
        writeln!(out, "A: {}\n", outcome.output)?;
        answers.push(outcome);
    }

    let report = ToolsReport { direct, answers };
    writeln!(out, "Total tokens used: {}", report.total_tokens())?;
    Ok(report)
}
