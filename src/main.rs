//! Gavel CLI entry point.

use anyhow::Result;
use clap::Parser;
use gavel::cli::{commands, Cli, Commands};
use gavel::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("gavel={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure data directories exist
    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.corpora_dir())?;

    // Execute command
    match &cli.command {
        Commands::Ask {
            question,
            mode,
            k,
            dated,
            json,
        } => {
            commands::run_ask(question, mode, *k, *dated, *json, settings).await?;
        }

        Commands::Index { corpus, file } => {
            commands::run_index(corpus, file, settings).await?;
        }

        Commands::Evaluate { file, k } => {
            commands::run_evaluate(file, *k, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
