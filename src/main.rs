//! TradeWizard scraper CLI - extract a website's candidate record as JSON
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradewizard_scraper::{to_json, Config, ScrapedRecord, Scraper};

#[derive(Parser)]
#[command(name = "tradewizard-scraper")]
#[command(author, version, about = "Extract products, contacts and content from a business website", long_about = None)]
struct Cli {
    /// Website URL to scrape; `https://` is assumed when no scheme is given
    #[arg(required_unless_present = "schema")]
    url: Option<String>,
    /// Read settings from this file instead of tradewizard.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
    /// Print the JSON Schema of the output record and exit
    #[arg(long)]
    schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let url = match cli.url {
        Some(url) if !cli.schema => url,
        // clap only accepts a missing URL together with --schema
        _ => {
            let schema = schemars::schema_for!(ScrapedRecord);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| {
        eprintln!("{} {}", "Configuration error:".red().bold(), e);
        e
    })?;
    if let Some(secs) = cli.timeout {
        config.scraper.timeout_secs = secs;
    }
    config.validate()?;

    let scraper = Scraper::new(config.scraper);
    let record = scraper.scrape(&url).await;
    if let Some(error) = &record.error {
        eprintln!("{} {}", "Scraping failed:".yellow().bold(), error);
    }
    println!("{}", to_json(&record, !cli.compact));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_or_schema_is_required() {
        assert!(Cli::try_parse_from(["tradewizard-scraper"]).is_err());
        assert!(Cli::try_parse_from(["tradewizard-scraper", "--schema"]).is_ok());

        let cli = Cli::try_parse_from(["tradewizard-scraper", "shop.test", "--compact"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("shop.test"));
        assert!(cli.compact);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let zero = Cli::try_parse_from(["tradewizard-scraper", "a.com", "--timeout", "0"]);
        assert!(zero.is_err());

        let cli = Cli::try_parse_from(["tradewizard-scraper", "a.com", "--timeout", "3"]).unwrap();
        assert_eq!(cli.timeout, Some(3));
    }
}
