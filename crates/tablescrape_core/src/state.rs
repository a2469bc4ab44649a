use crate::view_model::PanelView;
use crate::{ExportFormat, RunStats, RunStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    /// Stop requested; the in-flight page is still being processed.
    Stopping,
    Finished,
}

/// Control-surface state: what the panel shows and which actions it allows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    format: ExportFormat,
    current_page: u32,
    stats: RunStats,
    last_status: Option<RunStatus>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn view(&self) -> PanelView {
        PanelView::build(self)
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn current_page(&self) -> u32 {
        self.current_page
    }

    pub(crate) fn stats(&self) -> RunStats {
        self.stats
    }

    pub(crate) fn last_status(&self) -> Option<&RunStatus> {
        self.last_status.as_ref()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// A finished run left rows behind that could still be exported.
    pub(crate) fn has_exportable_rows(&self) -> bool {
        self.session == SessionState::Finished && self.stats.rows_scraped > 0
    }

    pub(crate) fn set_format(&mut self, format: ExportFormat) {
        if self.format != format {
            self.format = format;
            self.dirty = true;
        }
    }

    pub(crate) fn start_session(&mut self) {
        self.session = SessionState::Running;
        self.current_page = 1;
        self.stats = RunStats::default();
        self.last_status = None;
        self.dirty = true;
    }

    pub(crate) fn request_stop(&mut self) {
        self.session = SessionState::Stopping;
        self.dirty = true;
    }

    pub(crate) fn apply_progress(&mut self, current_page: u32, stats: RunStats) {
        self.current_page = current_page;
        self.apply_stats(stats);
    }

    pub(crate) fn apply_stats(&mut self, stats: RunStats) {
        if self.stats != stats {
            self.stats = stats;
            self.dirty = true;
        }
    }

    pub(crate) fn finish(&mut self, status: RunStatus, stats: RunStats) {
        self.session = SessionState::Finished;
        self.stats = stats;
        self.last_status = Some(status);
        self.dirty = true;
    }
}
