//! Spreadsheet-backed article log.
//!
//! The log is the first worksheet of a Google spreadsheet. Each saved article
//! is one row (`[title, date, topic, url, content]`) and column D doubles as
//! the index of already-logged URLs.
//!
//! # Submodules
//!
//! - [`auth`]: service account credentials and the OAuth token exchange
//! - [`worksheet`]: Sheets/Drive REST calls (open, read a column, append a row)
//! - [`retry`]: backoff applied to every Sheets/Drive call
//!
//! The pipeline only sees the [`ArticleLog`] trait, implemented by
//! [`worksheet::Worksheet`] and by [`DryRunLog`] for runs that must not touch
//! the spreadsheet.

use crate::models::Article;
use crate::utils::truncate_for_log;
use reqwest::StatusCode;
use std::error::Error;
use thiserror::Error;
use tracing::info;

pub mod auth;
pub mod retry;
pub mod worksheet;

/// Failures talking to Google.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("GOOGLE_CREDENTIALS environment variable not found!")]
    MissingCredentials,
    #[error("invalid service account credentials: {0}")]
    InvalidCredentials(String),
    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token exchange returned {status}: {body}")]
    TokenExchange { status: StatusCode, body: String },
    #[error("spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),
    #[error("spreadsheet {0} has no worksheets")]
    WorksheetMissing(String),
    #[error("{operation} returned {status}: {body}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SheetsError {
    /// Rate limiting, server-side errors, timeouts and connection failures.
    pub fn is_transient(&self) -> bool {
        match self {
            SheetsError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            SheetsError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Failures where Google cannot have applied the request: rate limiting,
    /// or a connection that was never established. A 5xx or a timeout may
    /// arrive after a write was committed.
    pub fn is_rejected_before_write(&self) -> bool {
        match self {
            SheetsError::Api { status, .. } => *status == StatusCode::TOO_MANY_REQUESTS,
            SheetsError::Transport(e) => e.is_connect(),
            _ => false,
        }
    }

    /// Build an [`SheetsError::Api`] from a non-success response.
    pub(crate) async fn from_response(operation: &'static str, response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        SheetsError::Api {
            operation,
            status,
            body: truncate_for_log(&body, 500),
        }
    }
}

/// Where articles are recorded and checked for duplicates.
pub trait ArticleLog {
    /// Every URL already in the log.
    async fn existing_urls(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// Record one article.
    async fn append(&self, article: &Article) -> Result<(), Box<dyn Error>>;
}

/// Log for `--dry-run`: nothing is ever logged and appends are only reported.
#[derive(Debug, Default)]
pub struct DryRunLog;

impl ArticleLog for DryRunLog {
    async fn existing_urls(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(Vec::new())
    }

    async fn append(&self, article: &Article) -> Result<(), Box<dyn Error>> {
        info!(url = %article.url, cells = article.to_row().len(), "Dry run; row not appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        let api = |status| SheetsError::Api {
            operation: "values.get",
            status,
            body: String::new(),
        };
        assert!(api(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(api(StatusCode::BAD_GATEWAY).is_transient());
        assert!(!api(StatusCode::NOT_FOUND).is_transient());
        assert!(!SheetsError::MissingCredentials.is_transient());
    }

    #[test]
    fn test_only_rate_limit_is_rejected_before_write() {
        let api = |status| SheetsError::Api {
            operation: "values.append",
            status,
            body: String::new(),
        };
        assert!(api(StatusCode::TOO_MANY_REQUESTS).is_rejected_before_write());
        assert!(!api(StatusCode::INTERNAL_SERVER_ERROR).is_rejected_before_write());
        assert!(!api(StatusCode::SERVICE_UNAVAILABLE).is_rejected_before_write());
    }

    #[test]
    fn test_missing_credentials_message() {
        assert_eq!(
            SheetsError::MissingCredentials.to_string(),
            "GOOGLE_CREDENTIALS environment variable not found!"
        );
    }

    #[tokio::test]
    async fn test_dry_run_log_never_has_urls() {
        let log = DryRunLog;
        assert!(log.existing_urls().await.unwrap().is_empty());
    }
}
