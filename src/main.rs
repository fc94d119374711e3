//! Review gateway - rate-limited progressive document analysis
//!
//! Loads configuration, installs logging and serves the HTTP API.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use review_gateway::server;
use review_gateway::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = review_gateway::DESCRIPTION)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = server::load_config(&cli.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    init_logging(config.logging());

    server::run_server(config).await.context("Gateway stopped with an error")
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps the context chain readable
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
