#![deny(missing_docs)]
//! Shared logging utilities for the scraper workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a fixed-capacity ring of recent log records for control surfaces, and a
//! minimal test initializer for the global logger.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use simplelog::{Config, SharedLogger};

/// Number of records kept by [`LogRing::default`].
pub const LOG_CAPACITY: usize = 100;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// One diagnostic record as surfaced to a control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Formatted message text.
    pub message: String,
    /// Severity of the record.
    pub level: Level,
    /// Wall-clock time the record was produced.
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn now(level: Level, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Utc::now(),
        }
    }
}

/// Fixed-capacity ring of log records; the oldest record is evicted first.
#[derive(Debug, Clone)]
pub struct LogRing<T = LogRecord> {
    capacity: usize,
    records: VecDeque<T>,
}

impl<T> LogRing<T> {
    /// Creates an empty ring holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Appends a record, evicting the oldest one when full.
    pub fn push(&mut self, record: T) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Keeps only the records matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.records.retain(keep);
    }

    /// Iterates records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for LogRing<T> {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

/// Ring shared between the logger and its readers.
pub type SharedLogRing = Arc<Mutex<LogRing<LogRecord>>>;

/// Logger that mirrors every accepted record into a [`SharedLogRing`].
///
/// Meant to be combined with terminal/file loggers in a
/// `simplelog::CombinedLogger`.
pub struct RingLogger {
    level: LevelFilter,
    ring: SharedLogRing,
}

impl RingLogger {
    /// Creates a boxed ring logger accepting records up to `level`.
    pub fn new(level: LevelFilter, ring: SharedLogRing) -> Box<Self> {
        Box::new(Self { level, ring })
    }
}

impl Log for RingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut ring) = self.ring.lock() {
            ring.push(LogRecord::now(record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

impl SharedLogger for RingLogger {
    fn level(&self) -> LevelFilter {
        self.level
    }

    fn config(&self) -> Option<&Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        self
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_evicts_oldest_when_full() {
        let mut ring = LogRing::with_capacity(3);
        for i in 0..5 {
            ring.push(i);
        }
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn default_ring_holds_one_hundred() {
        let mut ring: LogRing = LogRing::default();
        for i in 0..150 {
            ring.push(LogRecord::now(Level::Info, format!("line {i}")));
        }
        assert_eq!(ring.len(), LOG_CAPACITY);
        assert_eq!(ring.iter().next().unwrap().message, "line 50");
    }

    #[test]
    fn ring_logger_filters_by_level() {
        let ring: SharedLogRing = Arc::new(Mutex::new(LogRing::default()));
        let logger = RingLogger::new(LevelFilter::Warn, ring.clone());
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("ignored"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("kept"))
                .build(),
        );
        let ring = ring.lock().unwrap();
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.iter().next().unwrap().message, "kept");
    }
}
