//! Adaptive Performance Monitor CLI
//!
//! A command-line tool for inspecting a running perfmond instance:
//! current snapshot, component health, and manual pressure injection.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Adaptive Performance Monitor CLI
#[derive(Parser)]
#[command(name = "perfmon")]
#[command(author, version, about = "CLI for the adaptive performance monitor", long_about = None)]
pub struct Cli {
    /// Daemon API endpoint (can also be set via PERFMON_API_URL env var)
    #[arg(long, env = "PERFMON_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current monitor snapshot
    Status,

    /// Show daemon component health
    Health,

    /// Inject a critical memory pressure signal
    Pressure,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Status => commands::status::run(&client, cli.format).await,
        Commands::Health => commands::health::run(&client, cli.format).await,
        Commands::Pressure => commands::pressure::run(&client).await,
    }
}
