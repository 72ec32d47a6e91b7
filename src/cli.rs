//! Command-line surface and run orchestration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use crate::browser::webdriver::{WebDriverSession, resolve_url};
use crate::error::ScrapeError;
use crate::export::export_xlsx;
use crate::scrape::{Scraper, WaitConfig};

#[derive(Debug, Parser)]
#[command(
    name = "ctgov-scrape",
    version,
    about = "Scrapes ClinicalTrials.gov search results into an Excel spreadsheet"
)]
pub struct Cli {
    /// Search keyword (condition or disease)
    pub keyword: String,

    /// Destination .xlsx path; omit to run without writing a file
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// WebDriver endpoint (falls back to $WEBDRIVER_URL, then chromedriver's
    /// default http://localhost:9515)
    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Registry root (falls back to $CTGOV_BASE, then the live site)
    #[arg(long, value_name = "URL")]
    pub registry_base: Option<String>,

    /// Use the legacy unconditional sleeps instead of bounded polling
    #[arg(long)]
    pub fixed_waits: bool,

    /// Settling bound in seconds after submitting the query
    #[arg(long, value_name = "SECS")]
    pub search_timeout: Option<u64>,

    /// Settling bound in seconds per paginated results page
    #[arg(long, value_name = "SECS")]
    pub results_timeout: Option<u64>,

    /// Settling bound in seconds per study detail page
    #[arg(long, value_name = "SECS")]
    pub detail_timeout: Option<u64>,
}

/// Runs one scrape end to end and returns the operator-facing summary line.
///
/// The browser session is closed on every path out of here, including when
/// the run itself fails.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let keyword = cli.keyword.trim().to_string();
    if keyword.is_empty() {
        return Err(ScrapeError::InvalidArgument("keyword must not be empty".to_string()).into());
    }

    let waits = if cli.fixed_waits {
        WaitConfig::fixed()
    } else {
        WaitConfig::polling()
    }
    .with_bounds(
        cli.search_timeout.map(Duration::from_secs),
        cli.results_timeout.map(Duration::from_secs),
        cli.detail_timeout.map(Duration::from_secs),
    );

    let session = WebDriverSession::start(&resolve_url(cli.webdriver_url.as_deref())).await?;
    info!(session = session.session_id(), "WebDriver session started");
    let mut scraper = Scraper::new(session.clone()).with_waits(waits);
    if let Some(base) = cli.registry_base.as_deref() {
        scraper = scraper.with_base(base);
    }

    let outcome = scraper
        .run(&keyword, |progress| {
            info!(
                completed = progress.completed,
                total = progress.total,
                fraction = progress.fraction(),
                "extracted record"
            );
        })
        .await;

    // The session is released before any outcome surfaces.
    if let Err(err) = session.close().await {
        warn!(error = %err, "failed to close WebDriver session");
    }

    let records = outcome?;
    if records.is_empty() {
        return Ok("No data found.".to_string());
    }

    match export_xlsx(&records, cli.out.as_deref())? {
        Some(path) => Ok(format!(
            "Scraping completed. Data saved to {}",
            path.display()
        )),
        None => Ok(format!(
            "Scraping completed. {} records extracted; no output path supplied, nothing written.",
            records.len()
        )),
    }
}
