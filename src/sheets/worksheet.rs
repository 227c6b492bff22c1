//! The first worksheet of a Google spreadsheet, accessed over REST.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | find spreadsheet by title | Drive `GET /files?q=...` |
//! | pick first worksheet | Sheets `GET /spreadsheets/{id}?fields=sheets.properties` |
//! | read a column | Sheets `GET /spreadsheets/{id}/values/{range}?majorDimension=COLUMNS` |
//! | append a row | Sheets `POST /spreadsheets/{id}/values/{range}:append` |

use super::retry::Backoff;
use super::{ArticleLog, SheetsError};
use crate::config::SheetSettings;
use crate::models::{Article, URL_COLUMN};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use tracing::{debug, info, instrument};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Handle on the first worksheet ("sheet1") of one spreadsheet.
#[derive(Debug)]
pub struct Worksheet {
    client: Client,
    token: String,
    sheets_api_base: String,
    spreadsheet_id: String,
    title: String,
    backoff: Backoff,
}

impl Worksheet {
    /// Open by key when one is configured, otherwise look the title up in Drive.
    pub async fn open(client: &Client, token: &str, settings: &SheetSettings) -> Result<Self, SheetsError> {
        match &settings.spreadsheet_id {
            Some(id) => Self::open_by_key(client, token, settings, id).await,
            None => Self::open_by_title(client, token, settings, &settings.sheet_name).await,
        }
    }

    /// Find a spreadsheet the service account can see by its exact title.
    #[instrument(level = "info", skip(client, token, settings))]
    pub async fn open_by_title(
        client: &Client,
        token: &str,
        settings: &SheetSettings,
        title: &str,
    ) -> Result<Self, SheetsError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            escape_drive_literal(title),
            SPREADSHEET_MIME
        );
        let url = format!(
            "{}/files?q={}&fields=files(id,name)&supportsAllDrives=true&includeItemsFromAllDrives=true",
            settings.drive_api_base.trim_end_matches('/'),
            urlencoding::encode(&query)
        );

        let url = url.as_str();
        let backoff = Backoff::new(settings.max_retries);
        let list: FileList = backoff
            .run("drive.files.list", || async move {
                let response = client.get(url).bearer_auth(token).send().await?;
                if !response.status().is_success() {
                    return Err(SheetsError::from_response("drive.files.list", response).await);
                }
                Ok(response.json::<FileList>().await?)
            })
            .await?;

        let Some(file) = list.files.into_iter().next() else {
            return Err(SheetsError::SpreadsheetNotFound(title.to_string()));
        };
        debug!(spreadsheet_id = %file.id, "Resolved spreadsheet title");
        Self::open_by_key(client, token, settings, &file.id).await
    }

    /// Open a spreadsheet by key and select its first worksheet.
    #[instrument(level = "info", skip(client, token, settings))]
    pub async fn open_by_key(
        client: &Client,
        token: &str,
        settings: &SheetSettings,
        spreadsheet_id: &str,
    ) -> Result<Self, SheetsError> {
        let sheets_api_base = settings.sheets_api_base.trim_end_matches('/').to_string();
        let url = format!(
            "{}/spreadsheets/{}?fields=sheets.properties",
            sheets_api_base,
            urlencoding::encode(spreadsheet_id)
        );

        let url = url.as_str();
        let backoff = Backoff::new(settings.max_retries);
        let meta: SpreadsheetMeta = backoff
            .run("spreadsheets.get", || async move {
                let response = client.get(url).bearer_auth(token).send().await?;
                if !response.status().is_success() {
                    return Err(SheetsError::from_response("spreadsheets.get", response).await);
                }
                Ok(response.json::<SpreadsheetMeta>().await?)
            })
            .await?;

        let Some(first) = meta.sheets.into_iter().next() else {
            return Err(SheetsError::WorksheetMissing(spreadsheet_id.to_string()));
        };
        info!(worksheet = %first.properties.title, "Opened worksheet");

        Ok(Self {
            client: client.clone(),
            token: token.to_string(),
            sheets_api_base,
            spreadsheet_id: spreadsheet_id.to_string(),
            title: first.properties.title,
            backoff,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.sheets_api_base,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    /// All values of the 1-based `column`, top to bottom, blanks included.
    #[instrument(level = "info", skip(self), fields(worksheet = %self.title))]
    pub async fn col_values(&self, column: usize) -> Result<Vec<String>, SheetsError> {
        let letter = column_letter(column);
        let range = format!("{}!{letter}:{letter}", quote_sheet_title(&self.title));
        let url = format!("{}?majorDimension=COLUMNS", self.values_url(&range));

        let url = url.as_str();
        let values: ValueRange = self
            .backoff
            .run("values.get", || async move {
                let response = self.client.get(url).bearer_auth(&self.token).send().await?;
                if !response.status().is_success() {
                    return Err(SheetsError::from_response("values.get", response).await);
                }
                Ok(response.json::<ValueRange>().await?)
            })
            .await?;

        let column_values = values.values.into_iter().next().unwrap_or_default();
        debug!(count = column_values.len(), "Read column values");
        Ok(column_values)
    }

    /// Append one row after the last row of the worksheet's table.
    ///
    /// Only retried when Google rejected the request outright; a 5xx or a
    /// timeout may come back after the row was written.
    #[instrument(level = "info", skip_all, fields(worksheet = %self.title, cells = cells.len()))]
    pub async fn append_row(&self, cells: &[String]) -> Result<(), SheetsError> {
        let range = format!("{}!A1", quote_sheet_title(&self.title));
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(&range)
        );
        let url = url.as_str();
        let body = &json!({ "values": [cells] });

        self.backoff
            .run_if("values.append", SheetsError::is_rejected_before_write, || async move {
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(&self.token)
                    .json(body)
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(SheetsError::from_response("values.append", response).await);
                }
                Ok(())
            })
            .await?;

        info!("Appended row");
        Ok(())
    }
}

impl ArticleLog for Worksheet {
    async fn existing_urls(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.col_values(URL_COLUMN).await?)
    }

    async fn append(&self, article: &Article) -> Result<(), Box<dyn Error>> {
        Ok(self.append_row(&article.to_row()).await?)
    }
}

/// A1 column letters for a 1-based column index (`1` → `A`, `27` → `AA`).
pub fn column_letter(column: usize) -> String {
    let mut n = column.max(1);
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Quote a worksheet title for A1 notation, doubling embedded quotes.
fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Escape a value for a single-quoted Drive query literal.
fn escape_drive_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
