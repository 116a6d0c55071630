use clap::Parser;
use marketbrief::cli::commands::{Cli, Commands};
use marketbrief::config::{self, Settings};
use marketbrief::domain::ports::ledger::Ledger;
use marketbrief::domain::values::response_format::ResponseFormat;
use marketbrief::infrastructure::ledger::file_ledger::FileLedger;
use marketbrief::{DeliveryMode, MarketBrief};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_command(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Run { preview } => {
            let settings = Settings::from_env()?;
            let mode = match preview {
                Some(path) => DeliveryMode::Preview(path),
                None => DeliveryMode::Email,
            };
            let brief = MarketBrief::new(&settings, mode)?;
            let outcome = brief.run().await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Parse { file, format } => {
            let format: ResponseFormat = match format {
                Some(f) => f.parse()?,
                None => config::response_format_from_env()?,
            };
            let raw = std::fs::read_to_string(&file)?;
            let report = MarketBrief::parse_response(&raw, format)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Ledger { path } => {
            let path = path.unwrap_or_else(config::ledger_path_from_env);
            let ledger = FileLedger::new(&path);
            let count = ledger.load()?.len();
            println!("{count} processed article URLs in {}", path.display());
        }
    }
    Ok(())
}
