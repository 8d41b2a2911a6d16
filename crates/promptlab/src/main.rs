//! Run the promptlab exercises against an OpenAI-compatible chat API.
//!
//! Reads the API key from the `OPENAI_API_KEY` environment variable and an
//! optional endpoint override from `OPENAI_BASE_URL`.
//!
//! # Examples
//!
//! ```sh
//! # Fixed conversation
//! promptlab messages
//!
//! # Joke from a template
//! promptlab templates --topic penguins
//!
//! # Dish and recipe for a country
//! promptlab sequential Italy
//!
//! # Calculator tool and agent, with debug logging and tool traces
//! promptlab --verbose tools --show-tools
//! ```

use clap::{Parser, Subcommand};
use promptlab::agent::{AgentEvent, CompositeEventHandler, FnEventHandler, LoggingHandler};
use promptlab::api::OpenAiClient;
use promptlab::config::{DEFAULT_MODEL, ModelConfig};
use promptlab::exercises::{self, sequential::require_location, templates::DEFAULT_TOPIC};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Prompt templates, memory, and tool calling on a chat-completion API.
///
/// Reads the API key from the OPENAI_API_KEY environment variable.
#[derive(Parser)]
#[command(name = "promptlab", version)]
struct Cli {
    /// Model to use for completions.
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature. Defaults to the provider's, or 0 for `tools`.
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Log requests, tool calls, and token usage to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a fixed system/human/AI/human conversation.
    Messages,
    /// Render a joke template and print the model's answer.
    Templates {
        /// Topic substituted into the template.
        #[arg(long, default_value = DEFAULT_TOPIC)]
        topic: String,
    },
    /// Interactively collect a name and location, then summarize them.
    Chain,
    /// Ask for a classic dish from LOCATION, then for its recipe.
    Sequential {
        /// Country or region, e.g. "Italy".
        location: Option<String>,
    },
    /// Four scripted turns with raw-history memory.
    Memory,
    /// Four scripted turns with rolling-summary memory.
    Summary,
    /// Evaluate expressions with the calculator, then answer math questions
    /// through the tool-calling agent.
    Tools {
        /// Print each tool call and its result to stderr.
        #[arg(long)]
        show_tools: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_tool_event(event: &AgentEvent<'_>) {
    match event {
        AgentEvent::ToolExecuting { name, arguments } => eprintln!("  -> {name}({arguments})"),
        AgentEvent::ToolResult { name, result, .. } => eprintln!("  <- {name}: {result}"),
        _ => {}
    }
}

async fn run(cli: Cli) -> promptlab::Result<()> {
    // Argument problems are reported before any client is built.
    if let Command::Sequential { location } = &cli.command {
        require_location(location.as_deref())?;
    }

    let temperature = cli
        .temperature
        .or_else(|| matches!(cli.command, Command::Tools { .. }).then_some(0.0));
    let mut model_config = ModelConfig::new(cli.model);
    if let Some(t) = temperature {
        model_config = model_config.with_temperature(t);
    }
    let client = OpenAiClient::from_env(model_config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Messages => {
            exercises::messages::run(&client, &mut out).await?;
        }
        Command::Templates { topic } => {
            exercises::templates::run(&client, &topic, &mut out).await?;
        }
        Command::Chain => {
            let stdin = io::stdin();
            exercises::chain::run(&client, &mut stdin.lock(), &mut out).await?;
        }
        Command::Sequential { location } => {
            let location = require_location(location.as_deref())?;
            exercises::sequential::run(&client, location, &mut out).await?;
        }
        Command::Memory => {
            exercises::memory::run(&client, &mut out).await?;
        }
        Command::Summary => {
            exercises::summary::run(&client, &mut out).await?;
        }
        Command::Tools { show_tools } => {
            let events = CompositeEventHandler::new()
                .with(LoggingHandler)
                .with_if(show_tools, FnEventHandler::new(print_tool_event));
            exercises::tools::run(&client, &events, &mut out).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
