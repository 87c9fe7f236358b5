//! Swarmwright CLI, the main entry point.
//!
//! Commands:
//! - `run`      Plan, execute and reflect on a query
//! - `onboard`  Write a default config
//! - `config`   Show, validate or locate the config
//! - `doctor`   Diagnose setup problems

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "swarmwright",
    about = "Swarmwright: fault-tolerant plan, execute, reflect orchestration",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query through the swarm and print the answer
    Run {
        /// The query text
        #[arg(required_unless_present = "query_file", conflicts_with = "query_file")]
        query: Option<String>,

        /// Read the query from a file instead
        #[arg(long)]
        query_file: Option<PathBuf>,

        /// Override the number of revision cycles after the first attempt
        #[arg(long)]
        max_retries: Option<u32>,

        /// Print the full outcome (status, attempts, run id) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Onboard,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration and credentials
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets redacted
    Show,
    /// Check the config file for errors
    Validate,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run {
            query,
            query_file,
            max_retries,
            json,
        } => {
            let query = commands::run::resolve_query(query, query_file.as_deref())?;
            commands::run::run(&query, max_retries, json).await?
        }
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
