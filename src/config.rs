//! Runtime settings resolved from defaults, an optional YAML file and the CLI.
//!
//! The YAML file mirrors [`FileConfig`]; every key is optional:
//!
//! ```yaml
//! latest_url: https://techcrunch.com/latest/
//! sheet_name: TechCrunch Articles
//! spreadsheet_id: 1AbC...
//! user_agent: Mozilla/5.0 ...
//! json_output_dir: ./json
//! max_retries: 3
//! sheets_api_base: https://sheets.googleapis.com/v4
//! drive_api_base: https://www.googleapis.com/drive/v3
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument};

pub const DEFAULT_LATEST_URL: &str = "https://techcrunch.com/latest/";
pub const DEFAULT_SHEET_NAME: &str = "TechCrunch Articles";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Shape of the optional `config.yaml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub latest_url: Option<String>,
    pub sheet_name: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub user_agent: Option<String>,
    pub json_output_dir: Option<String>,
    pub max_retries: Option<usize>,
    pub sheets_api_base: Option<String>,
    pub drive_api_base: Option<String>,
}

/// Where the spreadsheet lives and how hard to try when talking to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSettings {
    pub sheet_name: String,
    pub spreadsheet_id: Option<String>,
    pub sheets_api_base: String,
    pub drive_api_base: String,
    pub max_retries: usize,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            spreadsheet_id: None,
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub latest_url: String,
    pub user_agent: String,
    pub json_output_dir: Option<String>,
    pub dry_run: bool,
    pub sheet: SheetSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            latest_url: DEFAULT_LATEST_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            json_output_dir: None,
            dry_run: false,
            sheet: SheetSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the config file named by `--config` (if any) and layer the CLI on top.
    #[instrument(level = "info", skip_all, fields(config = ?cli.config))]
    pub async fn resolve(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let file = match &cli.config {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                let file = parse_file_config(&raw)?;
                info!(path = %path, "Loaded configuration");
                file
            }
            None => FileConfig::default(),
        };
        let config = Self::merge(file, cli);
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Precedence is CLI, then file, then defaults.
    pub fn merge(file: FileConfig, cli: &Cli) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            latest_url: cli
                .latest_url
                .clone()
                .or(file.latest_url)
                .unwrap_or(defaults.latest_url),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
            json_output_dir: cli.json_output_dir.clone().or(file.json_output_dir),
            dry_run: cli.dry_run,
            sheet: SheetSettings {
                sheet_name: cli
                    .sheet_name
                    .clone()
                    .or(file.sheet_name)
                    .unwrap_or(defaults.sheet.sheet_name),
                spreadsheet_id: cli.spreadsheet_id.clone().or(file.spreadsheet_id),
                sheets_api_base: file
                    .sheets_api_base
                    .unwrap_or(defaults.sheet.sheets_api_base),
                drive_api_base: file
                    .drive_api_base
                    .unwrap_or(defaults.sheet.drive_api_base),
                max_retries: file.max_retries.unwrap_or(defaults.sheet.max_retries),
            },
        }
    }
}

pub fn parse_file_config(raw: &str) -> Result<FileConfig, serde_yaml::Error> {
    // An empty file deserializes to unit, not a map.
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(raw)
}
