//! CLI entrypoint for conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use conductor_application::{
    LlmGateway, NoProgress, ProcessOutput, ProcessRequestUseCase, ToolSessionHandle,
    ToolTransport,
};
use conductor_infrastructure::{
    ConfigLoader, FileConfig, McpHttpTransport, OpenAiConfig, OpenAiGateway,
};
use conductor_presentation::{
    ChatRepl, Cli, ConsoleFormatter, InterruptGuard, ProgressReporter,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting conductor");

    // === Dependency Injection ===
    let gateway = build_gateway(&config)?;
    let session = build_session(&config)?;
    let use_case = Arc::new(ProcessRequestUseCase::new(
        gateway,
        session,
        config.to_agent_config(),
    ));

    let result = run(&cli, &config, &use_case).await;
    use_case.shutdown().await;
    result
}

/// Merge config sources, apply CLI overrides, then validate
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if let Some(server) = &cli.mcp_server {
        config.mcp.server = Some(server.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn build_gateway(config: &FileConfig) -> Result<Arc<dyn LlmGateway>> {
    let mut openai = OpenAiConfig::new(config.llm.base_url.trim())
        .with_timeout(config.llm.timeout_seconds.map(Duration::from_secs));
    match config.llm.resolve_api_key() {
        Some(key) => openai = openai.with_api_key(key),
        None => warn!(
            env = %config.llm.api_key_env,
            "No API key configured, sending unauthenticated requests"
        ),
    }

    Ok(Arc::new(OpenAiGateway::new(openai)?))
}

fn build_session(config: &FileConfig) -> Result<Arc<ToolSessionHandle>> {
    let Some(server) = config.mcp.server_url() else {
        info!("No tool server configured, running without tools");
        return Ok(Arc::new(ToolSessionHandle::disconnected()));
    };

    let transport: Arc<dyn ToolTransport> = Arc::new(McpHttpTransport::with_timeout(
        server,
        config.llm.timeout_seconds.map(Duration::from_secs),
    )?);
    Ok(Arc::new(ToolSessionHandle::new(transport)))
}

async fn run(
    cli: &Cli,
    config: &FileConfig,
    use_case: &Arc<ProcessRequestUseCase>,
) -> Result<()> {
    let show_progress = config.output.show_progress && !cli.quiet;

    // Tool listing mode
    if cli.list_tools {
        let cancel = CancellationToken::new();
        let _interrupt = InterruptGuard::arm(&cancel);
        let catalog = use_case
            .refresh_tools(&cancel)
            .await
            .context("Failed to list tools")?;
        print!("{}", ConsoleFormatter::format_tools(&catalog));
        return Ok(());
    }

    initialize_tools(use_case).await;

    // Single request mode
    if let Some(input) = &cli.input {
        let output = run_single(use_case, input, show_progress).await?;
        print!("{}", ConsoleFormatter::format(&output));
        return Ok(());
    }

    // Chat mode (default without --input)
    let history = config.repl.history_file.as_deref().map(expand_home);
    ChatRepl::new(Arc::clone(use_case))
        .with_progress(show_progress)
        .with_history_file(history)
        .run()
        .await?;

    Ok(())
}

/// Load the tool registry. Ctrl-C here abandons only the refresh.
async fn initialize_tools(use_case: &ProcessRequestUseCase) {
    let startup = CancellationToken::new();
    let _interrupt = InterruptGuard::arm(&startup);
    let catalog = use_case.initialize(&startup).await;
    info!(tool_count = catalog.len(), "Tool registry ready");
}

/// Process one request under its own cancellation token
async fn run_single(
    use_case: &ProcessRequestUseCase,
    input: &str,
    show_progress: bool,
) -> Result<ProcessOutput> {
    let cancel = CancellationToken::new();
    let _interrupt = InterruptGuard::arm(&cancel);
    let output = if show_progress {
        let progress = ProgressReporter::new();
        use_case
            .process_with_progress(input, &cancel, &progress)
            .await?
    } else {
        use_case
            .process_with_progress(input, &cancel, &NoProgress)
            .await?
    };
    Ok(output)
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
