mod cli;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use genmedia::{message_badges, AppConfig, ProviderInvoker, ToolRegistry};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => AppConfig::config_path(),
    }
}

fn load_config(path: &Path) -> Result<AppConfig> {
    let mut config = AppConfig::load_from(path)?;
    config.apply_env_overrides();
    Ok(config)
}

/// Read a CLI argument that may be `-` for stdin.
fn read_input(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}

fn message_parts(message: Value) -> Result<Vec<Value>> {
    match message {
        Value::Array(parts) => Ok(parts),
        Value::Object(mut obj) => match obj.remove("parts") {
            Some(Value::Array(parts)) => Ok(parts),
            _ => bail!("Message has no 'parts' array"),
        },
        _ => bail!("Message must be an object with 'parts' or an array of parts"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = config_path(&cli)?;

    match cli.command {
        Command::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::save_default(&path)?;
            println!("Created default config: {}", path.display());
        }
        Command::Tools => {
            let registry = ToolRegistry::with_builtin_tools(ProviderInvoker::http(load_config(&path)?));
            for tool in registry.tools() {
                let entry = registry.entry(tool.name());
                println!(
                    "{} {} ({})\n    {}",
                    entry.badge.emoji,
                    entry.badge.display_name,
                    tool.name(),
                    tool.description()
                );
            }
        }
        Command::Schema { tool } => {
            let registry = ToolRegistry::with_builtin_tools(ProviderInvoker::http(load_config(&path)?));
            let tool = registry
                .get(&tool)
                .with_context(|| format!("Unknown tool: {}", tool))?;
            println!("{}", serde_json::to_string_pretty(&tool.to_definition())?);
        }
        Command::Invoke { tool, args } => {
            let config = load_config(&path)?;
            info!(api_base = %config.provider.api_base, "invoking {}", tool);
            let registry = ToolRegistry::with_builtin_tools(ProviderInvoker::http(config));
            let arguments = read_input(&args)?;
            let result = registry.execute(&tool, &arguments).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Badges { message } => {
            let raw = match message.to_str() {
                Some("-") => read_input("-")?,
                _ => std::fs::read_to_string(&message)
                    .with_context(|| format!("Failed to read message: {}", message.display()))?,
            };
            let parsed: Value = serde_json::from_str(&raw).context("Message is not valid JSON")?;
            for badge in message_badges(&message_parts(parsed)?) {
                println!("{} {}", badge.emoji, badge.display_name);
            }
        }
    }

    Ok(())
}
