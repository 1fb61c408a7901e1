// ABOUTME: Error types with structured exit codes for CLI
// ABOUTME: Maps export failures to specific exit codes for shell scripting

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    Usage(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Parse error on {endpoint}: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("API error {code} on {endpoint}: {message}")]
    Api {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("Conversion error: {0}")]
    Convert(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export finished with {0} failed item(s)")]
    Incomplete(usize),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 1,
            Error::Auth(_) => 2,
            Error::Fetch { .. } => 3,
            Error::Api { .. } => 4,
            Error::Parse { .. } => 5,
            Error::Write { .. } | Error::Directory { .. } => 6,
            Error::Convert(_) => 7,
            Error::Incomplete(_) => 8,
        }
    }

    /// Transport-level failure (connection refused, timeout, body read).
    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        Error::Fetch {
            url: url.into(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
