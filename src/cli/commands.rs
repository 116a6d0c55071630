use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketbrief", about = "Daily AI market briefing from financial news")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch new articles, analyze them, and send the briefing
    Run {
        /// Write the HTML report to this file instead of emailing it.
        /// Preview runs do not mark articles as processed.
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Parse a saved model response and print the report as JSON
    Parse {
        /// File containing the raw model response
        file: PathBuf,
        /// Response format (free-text, json); defaults to MARKETBRIEF_FORMAT
        #[arg(long)]
        format: Option<String>,
    },
    /// Show how many article URLs have been processed
    Ledger {
        /// Ledger file; defaults to MARKETBRIEF_LEDGER
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
