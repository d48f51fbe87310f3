//! Hermod CLI
//!
//! A command-line interface for dispatching mail through the Hermod
//! provider configured in the environment.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

/// Hermod CLI, send email through the configured delivery provider.
#[derive(Parser, Debug)]
#[command(name = "hermod", version, about)]
struct Cli {
    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a single email.
    Send(commands::send::SendArgs),
    /// Fan a newsletter issue out to eligible subscribers.
    Newsletter(commands::newsletter::NewsletterArgs),
    /// Manage newsletter subscribers.
    Subscribers(commands::subscribers::SubscribersArgs),
    /// Check that the active provider is reachable.
    Verify,
    /// Show which delivery provider is active.
    Provider,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Send(args) => commands::send::run(&args, &cli.format).await,
        Command::Newsletter(args) => commands::newsletter::run(&args, &cli.format).await,
        Command::Subscribers(args) => commands::subscribers::run(&args, &cli.format).await,
        Command::Verify => commands::verify::run(&cli.format).await,
        Command::Provider => commands::provider::run(&cli.format).await,
    }
}
