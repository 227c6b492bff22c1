//! Output generation beyond the spreadsheet row.
//!
//! # Submodules
//!
//! - [`json`]: writes each saved article to a dated JSON file
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2026-10-17/
//!     └── {slug-of-title}.json
//! ```

pub mod json;
