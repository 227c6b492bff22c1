//! Data models for scraped articles and their spreadsheet representation.
//!
//! - [`Article`]: the fields scraped from a single article page
//! - [`ArticleRecord`]: an [`Article`] stamped with the time it was saved,
//!   used for the optional JSON copy
//!
//! The spreadsheet row layout is fixed: `[title, date, topic, url, content]`,
//! which puts the article URL in column 4 ([`URL_COLUMN`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 1-based spreadsheet column holding the article URL.
pub const URL_COLUMN: usize = 4;

pub const NO_TITLE: &str = "No Title Found";
pub const NO_DATE: &str = "No Date Found";
pub const NO_TOPIC: &str = "No Topic Found";

/// An article as scraped from its page.
///
/// Missing fields are filled with the `No ... Found` placeholders rather than
/// left empty, except `content`, which may legitimately be empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Text of the first `<h1>`.
    pub title: String,
    /// Text of the first `<time>`, as displayed on the page.
    pub date: String,
    /// Tag link texts joined with `" - "`.
    pub topic: String,
    /// The article URL, also the dedupe key.
    pub url: String,
    /// Body paragraphs joined with newlines.
    pub content: String,
}

impl Article {
    /// Cells in spreadsheet column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.date.clone(),
            self.topic.clone(),
            self.url.clone(),
            self.content.clone(),
        ]
    }
}

/// A saved article plus the moment it was scraped.
#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleRecord {
    #[serde(flatten)]
    pub article: Article,
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Article {
        Article {
            title: "Startup raises Series A".to_string(),
            date: "10:15 AM PDT · October 17, 2026".to_string(),
            topic: "Startups - Venture".to_string(),
            url: "https://techcrunch.com/2026/10/17/startup-raises-series-a/".to_string(),
            content: "First paragraph.\nSecond paragraph.".to_string(),
        }
    }

    #[test]
    fn test_row_puts_url_in_url_column() {
        let article = sample();
        let row = article.to_row();
        assert_eq!(row.len(), 5);
        assert_eq!(row[URL_COLUMN - 1], article.url);
        assert_eq!(row[0], "Startup raises Series A");
        assert_eq!(row[4], "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_record_serialization_is_flat() {
        let record = ArticleRecord {
            article: sample(),
            scraped_at: "2026-10-18T09:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Startup raises Series A");
        assert_eq!(json["topic"], "Startups - Venture");
        assert_eq!(json["scraped_at"], "2026-10-18T09:00:00Z");
    }
}
