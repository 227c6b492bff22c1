//! TechCrunch article scraper.
//!
//! The "latest" listing renders one `loop-card` per story, newest first, with
//! the headline link carrying the class `loop-card__title-link`. Article pages
//! are WordPress posts: the headline is the page's `<h1>`, the byline time is
//! the first `<time>`, topics are `rel="tag"` links and the body is made of
//! `wp-block-paragraph` blocks.

use crate::models::{Article, NO_DATE, NO_TITLE, NO_TOPIC};
use crate::utils::stripped_text;
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

static LATEST_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.loop-card__title-link").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());
static TOPIC: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[rel~="tag"]"#).unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse(".wp-block-paragraph").unwrap());

/// Result of reading the listing page.
#[derive(Debug, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Absolute URL of the newest article.
    Found(String),
    /// The page loaded but held no article link.
    Empty,
    /// The page answered with something other than 200.
    Unavailable(StatusCode),
}

/// Result of reading an article page.
#[derive(Debug, PartialEq, Eq)]
pub enum ArticleOutcome {
    Fetched(Article),
    Unavailable(StatusCode),
}

/// Fetch the listing page and pick out the newest article URL.
///
/// # Errors
///
/// Transport failures and an unparsable `latest_url`. Non-200 statuses are
/// returned as [`IndexOutcome::Unavailable`].
#[instrument(level = "info", skip(client))]
pub async fn index_latest(client: &Client, latest_url: &str) -> Result<IndexOutcome, Box<dyn Error>> {
    let base = Url::parse(latest_url)?;
    let response = client.get(base.clone()).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        warn!(%status, "Listing page request failed");
        return Ok(IndexOutcome::Unavailable(status));
    }

    let html = response.text().await?;
    match parse_latest_link(&html, &base) {
        Some(url) => {
            info!(%url, "Found latest article");
            Ok(IndexOutcome::Found(url))
        }
        None => Ok(IndexOutcome::Empty),
    }
}

/// First title link on the listing.
///
/// Absolute hrefs are returned exactly as written, since the log is
/// deduplicated by exact string match. Relative hrefs are joined onto `base`.
pub fn parse_latest_link(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let Some(link) = document.select(&LATEST_LINK).next() else {
        debug!("No loop-card title link on page");
        return None;
    };
    let Some(href) = link.value().attr("href") else {
        warn!("Latest article link has no href");
        return None;
    };
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    match base.join(href) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            warn!(%href, error = %e, "Latest article href is not a valid URL");
            None
        }
    }
}

/// Fetch a single article and scrape its fields.
#[instrument(level = "info", skip(client))]
pub async fn fetch_article(client: &Client, url: &str) -> Result<ArticleOutcome, Box<dyn Error>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        warn!(%status, "Article request failed");
        return Ok(ArticleOutcome::Unavailable(status));
    }

    let body = response.text().await?;
    let article = parse_article(&body, url);
    info!(bytes = article.content.len(), "Parsed TechCrunch article");
    Ok(ArticleOutcome::Fetched(article))
}

/// Scrape title, date, topic and body from an article page.
pub fn parse_article(html: &str, url: &str) -> Article {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(stripped_text)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let date = document
        .select(&DATE)
        .next()
        .map(stripped_text)
        .unwrap_or_else(|| NO_DATE.to_string());

    let tags = document.select(&TOPIC).map(stripped_text).collect::<Vec<_>>();
    let topic = if tags.is_empty() {
        NO_TOPIC.to_string()
    } else {
        tags.iter().join(" - ")
    };

    let content = document.select(&PARAGRAPH).map(stripped_text).join("\n");

    Article {
        title,
        date,
        topic,
        url: url.to_string(),
        content,
    }
}
