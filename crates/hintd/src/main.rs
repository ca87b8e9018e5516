//! Hint Daemon - contextual coding hints for practice-site problem pages.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hint_common::HintdConfig;
use hintd::check::{run_checks, CheckStatus, CHECK_CASES};
use hintd::{server, GeminiClient};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "hintd", version, about = "Coding hint service")]
struct Cli {
    /// Config file (default: /etc/hintd/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Call the generation API for well-known titles and report the results
    CheckGeneration {
        /// Titles to check instead of the built-in list
        titles: Vec<String>,
    },
    /// Resolve one title through the full chain and print the JSON result
    Resolve { title: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => HintdConfig::load_from(path),
        None => HintdConfig::load(),
    };

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("hintd v{} starting", env!("CARGO_PKG_VERSION"));
            server::run(config).await
        }
        Command::CheckGeneration { titles } => check_generation(config, titles).await,
        Command::Resolve { title } => {
            let title = title.trim();
            if title.is_empty() {
                bail!("Question title is required");
            }
            let resolver = server::build_resolver(&config)?;
            let result = resolver.resolve(title).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn check_generation(config: HintdConfig, titles: Vec<String>) -> Result<()> {
    if config.generation.api_key.is_none() {
        bail!("GEMINI_API_KEY not found in environment or config");
    }
    let client = GeminiClient::new(config.generation)?;

    let custom: Vec<(&str, &str)> = titles.iter().map(|t| (t.as_str(), "")).collect();
    let cases = if custom.is_empty() { CHECK_CASES } else { &custom[..] };

    let outcomes = run_checks(&client, cases).await;
    for outcome in &outcomes {
        let label = match &outcome.status {
            CheckStatus::Passed => "PASS".to_string(),
            CheckStatus::Weak => format!("WEAK (no \"{}\")", outcome.expected),
            CheckStatus::Failed(e) => format!("FAIL ({})", e),
        };
        println!("[{}] {}", label, outcome.title);
        if let Some(hint) = &outcome.hint {
            println!("    {}", hint);
        }
    }

    let generated = outcomes.iter().filter(|o| o.generated()).count();
    println!("\n{}/{} titles produced a hint", generated, outcomes.len());
    if generated == 0 {
        bail!("Generation API check failed");
    }
    Ok(())
}
