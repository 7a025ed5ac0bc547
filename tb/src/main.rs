//! Toolbelt - sandboxed tools for model-driven coding
//!
//! CLI entry point for listing and invoking tools by hand.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use toolbelt::cli::{Cli, Command};
use toolbelt::config::Config;
use toolbelt::tools::{ToolContext, ToolRegistry};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolbelt")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, stdout carries tool output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("toolbelt.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(root) = cli.root {
        config.sandbox.root = Some(root);
    }

    info!(
        "Toolbelt loaded config: root={:?}, enabled={:?}",
        config.sandbox.root, config.tools.enabled
    );

    let registry = config.registry();

    match cli.command {
        Command::Tools => cmd_tools(&registry),
        Command::Schema => cmd_schema(&registry),
        Command::Call {
            name,
            input,
            input_file,
        } => {
            let ctx = config.tool_context()?;
            cmd_call(&registry, ctx, &name, input, input_file).await
        }
    }
}

/// List enabled tools with the first line of each description
fn cmd_tools(registry: &ToolRegistry) -> Result<()> {
    for def in registry.definitions() {
        let summary = def.description.lines().next().unwrap_or_default();
        println!("{:<20} {}", def.name, summary);
    }
    Ok(())
}

/// Print tool definitions as JSON
fn cmd_schema(registry: &ToolRegistry) -> Result<()> {
    let json = serde_json::to_string_pretty(&registry.definitions()).context("Failed to serialize definitions")?;
    println!("{}", json);
    Ok(())
}

/// Invoke one tool; Ctrl-C cancels the session
async fn cmd_call(
    registry: &ToolRegistry,
    ctx: ToolContext,
    name: &str,
    input: Option<String>,
    input_file: Option<PathBuf>,
) -> Result<()> {
    let raw = match (input, input_file) {
        (Some(input), _) => input,
        (None, Some(path)) => {
            fs::read_to_string(&path).context(format!("Failed to read input from {}", path.display()))?
        }
        (None, None) => "{}".to_string(),
    };
    let input: Value = serde_json::from_str(&raw).context("Tool input is not valid JSON")?;

    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling session");
            cancel.cancel();
        }
    });

    let result = registry.execute(name, input, &ctx).await;
    if result.is_error {
        eprintln!("{}", result.content);
        std::process::exit(1);
    }

    println!("{}", result.content);
    Ok(())
}
