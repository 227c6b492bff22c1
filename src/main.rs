//! # TechCrunch Sheet Log
//!
//! Scrapes the newest TechCrunch article and records it as a row in a Google
//! spreadsheet, unless the spreadsheet already has it.
//!
//! ## Usage
//!
//! ```sh
//! GOOGLE_CREDENTIALS=$(base64 -w0 service-account.json) techcrunch_sheet_log
//! ```
//!
//! ## Architecture
//!
//! One linear run, meant to be triggered by an external scheduler:
//! 1. **Authenticating**: exchange the service account key for a token and open the log
//! 2. **Indexing**: find the newest article URL on the listing page
//! 3. **Dedupe**: stop if the URL is already in column D of the log
//! 4. **Scraping**: fetch the article and extract title, date, topic and body
//! 5. **Appending**: add `[title, date, topic, url, content]` as a new row

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod sheets;
mod utils;

use cli::Cli;
use config::AppConfig;
use outputs::json;
use pipeline::RunOutcome;
use sheets::auth::{SCOPES, ServiceAccountKey, fetch_access_token};
use sheets::worksheet::Worksheet;
use sheets::DryRunLog;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("techcrunch_sheet_log starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, ?args.json_output_dir, dry_run = args.dry_run, "Parsed CLI arguments");
    let config = AppConfig::resolve(&args).await?;

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &config.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let scraper = scrapers::http_client(&config.user_agent)?;

    let outcome = if config.dry_run {
        info!("Dry run; the spreadsheet will not be read or written");
        pipeline::run(&scraper, &config.latest_url, &DryRunLog).await?
    } else {
        let worksheet = open_log(&args, &config).await?;
        pipeline::run(&scraper, &config.latest_url, &worksheet).await?
    };

    match &outcome {
        RunOutcome::Saved(article) => {
            if let Some(dir) = &config.json_output_dir {
                if let Err(e) = json::write_article(article, dir).await {
                    error!(error = %e, "Failed to write article JSON");
                }
            }
        }
        RunOutcome::AlreadyLogged(url) => info!(%url, "Nothing new to log"),
        RunOutcome::NoArticles => warn!(url = %config.latest_url, "Listing page had no articles"),
        RunOutcome::IndexUnavailable(status) => {
            error!(url = %config.latest_url, status = status.as_u16(), "Listing page unavailable")
        }
        RunOutcome::ArticleUnavailable { url, status } => {
            error!(%url, status = status.as_u16(), "Article page unavailable")
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        saved = matches!(outcome, RunOutcome::Saved(_)),
        "Execution complete"
    );

    Ok(())
}

/// Authenticate with the service account and open the log worksheet.
#[instrument(level = "info", skip_all, fields(sheet_name = %config.sheet.sheet_name))]
async fn open_log(args: &Cli, config: &AppConfig) -> Result<Worksheet, Box<dyn Error>> {
    let key = ServiceAccountKey::from_base64(args.google_credentials.as_deref())?;
    let google = reqwest::Client::new();
    let token = fetch_access_token(&google, &key, &SCOPES).await?;
    let worksheet = Worksheet::open(&google, &token, &config.sheet).await?;
    info!(worksheet = %worksheet.title(), "Authenticated with Google Sheets");
    Ok(worksheet)
}
