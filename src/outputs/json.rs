//! JSON copy of saved articles.
//!
//! # Output Structure
//!
//! Files are organized by the local date of the run, one file per article:
//! ```text
//! json_output_dir/
//! └── 2026-10-17/
//!     └── robotics-startup-raises-40m-to-automate-warehouses.json
//! ```

use crate::models::{Article, ArticleRecord};
use crate::utils::slugify_title;
use chrono::{Local, Utc};
use std::error::Error;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument};

/// Write an [`Article`] as `{json_output_dir}/{date}/{slug}.json`.
///
/// Existing files are left alone; the name gets a numeric suffix instead.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_article(article: &Article, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let record = ArticleRecord {
        article: article.clone(),
        scraped_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&record)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(Local::now().date_naive().to_string());
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let slug = match slugify_title(&article.title) {
        s if s.is_empty() => "untitled".to_string(),
        s => s,
    };

    // Never overwrite: a second article with the same title gets `-2`, `-3`, ...
    let mut n = 1usize;
    loop {
        let name = if n == 1 {
            format!("{slug}.json")
        } else {
            format!("{slug}-{n}.json")
        };
        let path = full_json_dir.join(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                file.write_all(json.as_bytes()).await?;
                file.flush().await?;
                info!(path = %path.display(), "Wrote article JSON");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Article JSON name taken");
                n += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
