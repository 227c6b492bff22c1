//! Command-line interface definitions for TechCrunch Sheet Log.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and spreadsheet selection can also be supplied through
//! environment variables, which is how the job is usually deployed.

use clap::Parser;

/// Command-line arguments for the TechCrunch Sheet Log application.
///
/// Every option except the credentials is optional. Values given here take
/// precedence over a YAML config file passed with `--config`, which in turn
/// takes precedence over the built-in defaults.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment, default sheet name
/// GOOGLE_CREDENTIALS=$(base64 -w0 service-account.json) techcrunch_sheet_log
///
/// # Scrape only, never touch the spreadsheet
/// techcrunch_sheet_log --dry-run
///
/// # Also keep a JSON copy of each saved article
/// techcrunch_sheet_log -j ./json --sheet-name "My Articles"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base64-encoded Google service account JSON
    #[arg(long, env = "GOOGLE_CREDENTIALS", hide_env_values = true)]
    pub google_credentials: Option<String>,

    /// Title of the spreadsheet used as the article log
    #[arg(long, env = "SHEET_NAME")]
    pub sheet_name: Option<String>,

    /// Spreadsheet key; skips the lookup by title when set
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Listing page that links the newest article first
    #[arg(long)]
    pub latest_url: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for a JSON copy of each saved article
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Scrape and report without reading or writing the spreadsheet
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "techcrunch_sheet_log",
            "--google-credentials",
            "ZXlKaA==",
            "--sheet-name",
            "My Articles",
            "--latest-url",
            "https://example.com/latest/",
        ]);

        assert_eq!(cli.google_credentials.as_deref(), Some("ZXlKaA=="));
        assert_eq!(cli.sheet_name.as_deref(), Some("My Articles"));
        assert_eq!(cli.latest_url.as_deref(), Some("https://example.com/latest/"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&[
            "techcrunch_sheet_log",
            "-c",
            "/etc/techcrunch/config.yaml",
            "-j",
            "/tmp/json",
            "--dry-run",
        ]);

        assert_eq!(cli.config.as_deref(), Some("/etc/techcrunch/config.yaml"));
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
        assert!(cli.dry_run);
    }
}
