//! News source scrapers.
//!
//! Scraping follows the same two-phase pattern for every source:
//!
//! 1. **Indexing**: discover the newest article URL from the source's listing page
//! 2. **Fetching**: download and parse that article's fields
//!
//! # Supported Sources
//!
//! | Source | Module | Listing page | Notes |
//! |--------|--------|--------------|-------|
//! | TechCrunch | [`techcrunch`] | `https://techcrunch.com/latest/` | WordPress markup, first `loop-card` is newest |
//!
//! Non-200 responses are not errors here: they are reported as `Unavailable`
//! outcomes so the caller can stop quietly, the same way a missing link does.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;

pub mod techcrunch;

/// Build the HTTP client used for scraping, sending `user_agent` on every request.
pub fn http_client(user_agent: &str) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;
    Ok(client)
}
