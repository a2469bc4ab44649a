use tablescrape_core::{Artifact, RunStats, RunStatus};

use crate::decode::DecodeError;

/// A configured CSS selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector `{selector}`: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Recoverable: the table may appear once content loads.
    #[error("no table matching `{selector}` found")]
    NoTableFound { selector: String },
}

/// Failures of the live document behind a [`crate::PageSurface`].
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),
    #[error("network error: {0}")]
    Network(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("navigation failed: {0}")]
    NavigationFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Faults that end a run as failed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("data failed to load on page {page} after {checks} checks")]
    LoadTimeout { page: u32, checks: u32 },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("scraping already in progress")]
    AlreadyRunning,
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Outcome of one finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    pub stats: RunStats,
    pub row_count: usize,
    pub artifact: Option<Artifact>,
}
