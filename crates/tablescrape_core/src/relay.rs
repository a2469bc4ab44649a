//! Process-scoped monitoring state shared by every page context.
//!
//! The registry keeps the latest stats per tab plus a bounded ring of log
//! lines tagged with their tab. Entries live until the tab closes.

use std::collections::BTreeMap;
use std::time::SystemTime;

use engine_logging::{LogRecord, LogRing};

use crate::{RunStats, ScraperEvent};

pub type TabId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSnapshot {
    pub url: String,
    pub stats: RunStats,
    pub is_running: bool,
    pub last_update: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLog {
    pub tab_id: TabId,
    pub record: LogRecord,
}

#[derive(Debug, Clone, Default)]
pub struct MonitorRegistry {
    tabs: BTreeMap<TabId, TabSnapshot>,
    logs: LogRing<TabLog>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one engine event from `tab_id` into the registry.
    pub fn observe(&mut self, tab_id: TabId, url: &str, event: &ScraperEvent) {
        match event {
            ScraperEvent::StatsUpdate { stats, is_running } => {
                self.record_stats(tab_id, url, *stats, *is_running);
            }
            ScraperEvent::Progress { stats, .. } => self.record_stats(tab_id, url, *stats, true),
            ScraperEvent::Finished { stats, .. } => self.record_stats(tab_id, url, *stats, false),
            ScraperEvent::Log(record) => self.record_log(tab_id, record.clone()),
            ScraperEvent::Download { .. } => {}
        }
    }

    pub fn record_stats(&mut self, tab_id: TabId, url: &str, stats: RunStats, is_running: bool) {
        self.tabs.insert(
            tab_id,
            TabSnapshot {
                url: url.to_string(),
                stats,
                is_running,
                last_update: SystemTime::now(),
            },
        );
    }

    pub fn record_log(&mut self, tab_id: TabId, record: LogRecord) {
        self.logs.push(TabLog { tab_id, record });
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&TabSnapshot> {
        self.tabs.get(&tab_id)
    }

    pub fn tabs(&self) -> impl Iterator<Item = (TabId, &TabSnapshot)> {
        self.tabs.iter().map(|(id, snapshot)| (*id, snapshot))
    }

    pub fn logs_for(&self, tab_id: TabId) -> Vec<&LogRecord> {
        self.logs
            .iter()
            .filter(|entry| entry.tab_id == tab_id)
            .map(|entry| &entry.record)
            .collect()
    }

    /// A reload drops the stale snapshot but keeps the tab's logs.
    pub fn tab_reloaded(&mut self, tab_id: TabId) {
        self.tabs.remove(&tab_id);
    }

    /// Evicts every trace of a closed tab.
    pub fn close_tab(&mut self, tab_id: TabId) {
        self.tabs.remove(&tab_id);
        self.logs.retain(|entry| entry.tab_id != tab_id);
    }
}
