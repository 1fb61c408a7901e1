// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Credentials, output location, folder list, and throttle flags

use crate::api::DEFAULT_ACCOUNT_SERVER;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wiz-export")]
#[command(about = "Export WizNote folders to Markdown files with their attachments", long_about = None)]
#[command(version)]
#[command(after_help = "Example:\n  wiz-export --output ~/notes --user-id me@example.com --password '...' --folders '/Journal/,/Work/'")]
pub struct Cli {
    /// Account user id (falls back to WIZ_USER_ID)
    #[arg(long)]
    pub user_id: Option<String>,

    /// Account password (falls back to WIZ_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Output root directory
    #[arg(long, default_value = ".")]
    pub output: PathBuf,

    /// Comma-separated folders to export, like /Journal/,/Work/
    #[arg(long)]
    pub folders: Option<String>,

    /// Account server used for login
    #[arg(long, default_value = DEFAULT_ACCOUNT_SERVER)]
    pub account_server: String,

    /// Delay between requests in ms
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Disable the inter-request delay (not recommended)
    #[arg(long)]
    pub no_throttle: bool,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Keep backslashes in converted Markdown instead of stripping them
    #[arg(long)]
    pub keep_backslashes: bool,

    /// Exit non-zero if any folder, document or resource failed
    #[arg(long)]
    pub strict: bool,

    /// Only log errors and hide progress
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every request
    #[arg(long, short)]
    pub verbose: bool,
}
