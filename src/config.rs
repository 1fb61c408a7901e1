// ABOUTME: Export run configuration built once from the CLI
// ABOUTME: Passed by reference into the exporter instead of process-wide state

use crate::cli::Cli;
use crate::convert::MarkdownConverter;
use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_root: PathBuf,
    pub folders: Vec<String>,
    /// Pause after every resource, document and folder.
    pub delay: Duration,
    pub converter: MarkdownConverter,
    pub strict: bool,
}

impl ExportConfig {
    pub fn new(output_root: impl Into<PathBuf>, folders: Vec<String>) -> Self {
        ExportConfig {
            output_root: output_root.into(),
            folders,
            delay: Duration::from_millis(100),
            converter: MarkdownConverter::default(),
            strict: false,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let list = cli.folders.as_deref().unwrap_or_default();
        let folders = parse_folders(list);
        if folders.is_empty() {
            return Err(Error::Usage("missing folders (--folders)".into()));
        }

        let mut config = ExportConfig::new(cli.output.clone(), folders);
        config.delay = if cli.no_throttle {
            Duration::ZERO
        } else {
            Duration::from_millis(cli.delay_ms)
        };
        if cli.keep_backslashes {
            config.converter = config.converter.keep_backslashes();
        }
        config.strict = cli.strict;

        Ok(config)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

/// Splits a comma-separated folder list, trimming entries and dropping empty ones.
pub fn parse_folders(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect()
}
