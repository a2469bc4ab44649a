use engine_logging::LogRecord;

use crate::{ExportFormat, RunStats, RunStatus};

/// A serialized export ready to be persisted by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub format: ExportFormat,
    pub content: String,
}

impl Artifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Events flowing from the extraction engine to the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScraperEvent {
    /// Emitted after each processed page.
    Progress { current_page: u32, stats: RunStats },
    /// Summary emitted on run start, after each page, and at run end.
    StatsUpdate { stats: RunStats, is_running: bool },
    /// Diagnostic line for monitoring observers.
    Log(LogRecord),
    /// Terminal status of a run.
    Finished { status: RunStatus, stats: RunStats },
    /// Ask the platform to persist an artifact.
    Download { artifact: Artifact, save_as: bool },
}
