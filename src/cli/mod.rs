//! CLI module for Gavel.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gavel - Cited Q&A over City Council Proceedings
///
/// Ask questions about New Orleans City Council proceedings and get answers
/// with citations back to the records that support them.
#[derive(Parser, Debug)]
#[command(name = "gavel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question and get a cited answer
    Ask {
        /// The question to ask
        question: String,

        /// Response mode (only "in_depth" is implemented)
        #[arg(short, long, default_value = "in_depth")]
        mode: String,

        /// Documents to retrieve per corpus
        #[arg(short, long)]
        k: Option<usize>,

        /// Treat the question as time-scoped and ask the model to sort
        /// documents by publish date
        #[arg(long)]
        dated: bool,

        /// Print the raw response card JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Ingest documents into a corpus from a JSONL file
    Index {
        /// Target corpus (minutes, committees, pdfs, press, news)
        corpus: String,

        /// JSONL file with one document per line
        file: PathBuf,
    },

    /// Run the evaluation harness over a TSV query file
    Evaluate {
        /// TSV file: header row, then "query" or "query<TAB>expected_output"
        file: PathBuf,

        /// Documents to retrieve per corpus
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Start the HTTP answer API
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
