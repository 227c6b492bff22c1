//! One run: newest link → dedupe check → scrape → append.
//!
//! Every early stop is a [`RunOutcome`] rather than an error, so a run that
//! finds nothing new still exits cleanly.

use crate::models::Article;
use crate::scrapers::techcrunch::{self, ArticleOutcome, IndexOutcome};
use crate::sheets::ArticleLog;
use crate::utils::preview;
use reqwest::{Client, StatusCode};
use std::error::Error;
use tracing::{info, instrument, warn};

/// How many content characters are echoed to the log.
const CONTENT_PREVIEW_CHARS: usize = 200;

/// How a run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The article was scraped and appended.
    Saved(Article),
    /// The newest article is already in the log.
    AlreadyLogged(String),
    /// The listing page had no article link.
    NoArticles,
    IndexUnavailable(StatusCode),
    ArticleUnavailable { url: String, status: StatusCode },
}

#[instrument(level = "info", skip(client, log))]
pub async fn run<L: ArticleLog>(
    client: &Client,
    latest_url: &str,
    log: &L,
) -> Result<RunOutcome, Box<dyn Error>> {
    let url = match techcrunch::index_latest(client, latest_url).await? {
        IndexOutcome::Found(url) => url,
        IndexOutcome::Empty => {
            info!("No articles found.");
            return Ok(RunOutcome::NoArticles);
        }
        IndexOutcome::Unavailable(status) => {
            warn!(status = status.as_u16(), "Failed to retrieve TechCrunch");
            return Ok(RunOutcome::IndexUnavailable(status));
        }
    };
    info!(%url, "Latest article URL");

    let existing = log.existing_urls().await?;
    if existing.iter().any(|logged| logged == &url) {
        info!(%url, "Article already exists in the log; skipping");
        return Ok(RunOutcome::AlreadyLogged(url));
    }

    let article = match techcrunch::fetch_article(client, &url).await? {
        ArticleOutcome::Fetched(article) => article,
        ArticleOutcome::Unavailable(status) => {
            warn!(%url, status = status.as_u16(), "Failed to retrieve article");
            return Ok(RunOutcome::ArticleUnavailable { url, status });
        }
    };

    info!(
        title = %article.title,
        date = %article.date,
        topic = %article.topic,
        content = %preview(&article.content, CONTENT_PREVIEW_CHARS),
        "Scraped article"
    );

    log.append(&article).await?;
    info!(%url, "New article saved to the log");
    Ok(RunOutcome::Saved(article))
}
