use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DedupEngine, Row};

/// Sub-step of a running extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    AwaitingLoad,
    Extracting,
    Advancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running(PageStep),
    Completed,
    Stopped,
    Failed,
}

impl Phase {
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Running(_))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Stopped | Phase::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub pages_processed: u32,
    pub rows_scraped: u64,
    pub duplicates_found: u64,
    pub errors: u32,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Stopped,
    Failed { reason: String },
}

impl RunStatus {
    pub fn phase(&self) -> Phase {
        match self {
            RunStatus::Completed => Phase::Completed,
            RunStatus::Stopped => Phase::Stopped,
            RunStatus::Failed { .. } => Phase::Failed,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Stopped => write!(f, "stopped"),
            RunStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Mutable state of one run, owned by the extraction loop.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    phase: Phase,
    current_page: u32,
    rows: Vec<Row>,
    dedup: DedupEngine,
    stats: RunStats,
    columns: Option<Vec<String>>,
    advances: u32,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything and positions the run on page 1.
    pub fn reset(&mut self) {
        *self = Self {
            current_page: 1,
            ..Self::default()
        };
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Records one page advance.
    pub fn next_page(&mut self) {
        self.current_page += 1;
        self.advances += 1;
    }

    pub fn advances(&self) -> u32 {
        self.advances
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Column names pinned by the first header read of the run.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn pin_columns(&mut self, columns: Vec<String>) {
        if self.columns.is_none() {
            self.columns = Some(columns);
        }
    }

    /// Dedup check that also counts duplicates in the stats.
    pub fn is_duplicate(&mut self, row: &Row) -> bool {
        let duplicate = self.dedup.is_duplicate(row);
        if duplicate {
            self.stats.duplicates_found += 1;
        }
        duplicate
    }

    /// Appends the unique rows of one processed page.
    pub fn accept_page(&mut self, rows: Vec<Row>) {
        self.stats.pages_processed += 1;
        self.stats.rows_scraped += rows.len() as u64;
        self.rows.extend(rows);
    }

    pub fn record_error(&mut self) {
        self.stats.errors += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_rows_stats_and_seen_rows() {
        let mut run = RunState::new();
        run.reset();
        let row = Row::from_pairs([("A", "1")]);
        assert!(!run.is_duplicate(&row));
        assert!(run.is_duplicate(&row));
        run.accept_page(vec![row.clone()]);
        run.pin_columns(vec!["A".into()]);
        run.next_page();

        run.reset();
        assert_eq!(run.current_page(), 1);
        assert_eq!(run.stats(), RunStats::default());
        assert!(run.rows().is_empty());
        assert!(run.columns().is_none());
        assert!(!run.is_duplicate(&row));
    }

    #[test]
    fn first_pinned_columns_win() {
        let mut run = RunState::new();
        run.pin_columns(vec!["A".into()]);
        run.pin_columns(vec!["B".into()]);
        assert_eq!(run.columns(), Some(&["A".to_string()][..]));
    }

    #[test]
    fn stats_follow_pages_and_duplicates() {
        let mut run = RunState::new();
        run.reset();
        let row = Row::from_pairs([("A", "1")]);
        run.is_duplicate(&row);
        run.is_duplicate(&row);
        run.accept_page(vec![row]);
        run.record_error();
        let stats = run.stats();
        assert_eq!(stats.pages_processed, 1);
        assert_eq!(stats.rows_scraped, 1);
        assert_eq!(stats.duplicates_found, 1);
        assert_eq!(stats.errors, 1);
    }
}
