use crate::{AppState, ExportFormat, RunStats, RunStatus, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelView {
    pub session: SessionState,
    pub format: ExportFormat,
    pub status_text: String,
    pub progress_text: Option<String>,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub export_enabled: bool,
    pub stats: RunStats,
    pub dirty: bool,
}

impl PanelView {
    pub(crate) fn build(state: &AppState) -> Self {
        let session = state.session();
        let stats = state.stats();
        let page = state.current_page();

        let status_text = match (session, state.last_status()) {
            (SessionState::Idle, _) => "Ready to scrape".to_string(),
            (SessionState::Running, _) => format!("Processing page {page}..."),
            (SessionState::Stopping, _) => "Stopping after the current page...".to_string(),
            (SessionState::Finished, Some(RunStatus::Completed)) => {
                "Scraping completed!".to_string()
            }
            (SessionState::Finished, Some(RunStatus::Stopped)) => "Scraping stopped".to_string(),
            (SessionState::Finished, Some(RunStatus::Failed { reason })) => {
                format!("Scraping failed: {reason}")
            }
            (SessionState::Finished, None) => "Ready to scrape".to_string(),
        };

        let progress_text = match (session, state.last_status()) {
            (SessionState::Running | SessionState::Stopping, _) => Some(format!(
                "Page {page} \u{2022} {} rows collected",
                stats.rows_scraped
            )),
            (SessionState::Finished, Some(RunStatus::Completed)) => Some(format!(
                "Complete! {} rows collected",
                stats.rows_scraped
            )),
            _ => None,
        };

        let busy = matches!(session, SessionState::Running | SessionState::Stopping);
        Self {
            session,
            format: state.format(),
            status_text,
            progress_text,
            start_enabled: !busy,
            stop_enabled: session == SessionState::Running,
            export_enabled: state.has_exportable_rows(),
            stats,
            dirty: state.is_dirty(),
        }
    }
}
