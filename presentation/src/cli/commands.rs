//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for conductor
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(author, version, about = "Route natural-language requests to MCP tools")]
#[command(long_about = r#"
Conductor asks an LLM which tools (if any) a request needs, runs them on an
MCP tool server, and optionally has the LLM reshape the combined output.

For every request:
1. Decide: the model picks tool calls and arguments from the advertised tools
2. Validate: each call is checked against the tool's parameter schema
3. Dispatch: valid calls run in order; failures do not stop the batch
4. Post-process: the joined output is summarized/reformatted on request

Configuration files are loaded from (in priority order):
1. CONDUCTOR_* environment variables (e.g. CONDUCTOR_LLM__MODEL)
2. --config <path>            Explicit config file
3. ./conductor.toml           Project-level config
4. ~/.config/conductor/config.toml   Global config

Example:
  conductor --input "Summarize https://example.com"
  conductor --mcp-server http://localhost:8080/mcp --list-tools
  conductor --chat -m gpt-4o
"#)]
pub struct Cli {
    /// Process a single request and exit
    #[arg(short, long, value_name = "TEXT")]
    pub input: Option<String>,

    /// Start interactive chat mode (the default when no input is given)
    #[arg(short, long, conflicts_with = "input")]
    pub chat: bool,

    /// List the tools the server advertises and exit
    #[arg(long, conflicts_with_all = ["input", "chat"])]
    pub list_tools: bool,

    /// Model for the decision and post-process calls
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// MCP server endpoint (streamable HTTP)
    #[arg(long, value_name = "URL")]
    pub mcp_server: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
