use engine_logging::{LogRecord, LOG_CAPACITY};
use log::Level;
use tablescrape_core::relay::MonitorRegistry;
use tablescrape_core::{RunStats, ScraperEvent};

const URL: &str = "https://example.com/embeds/1/2";

#[test]
fn stats_update_is_recorded_per_tab() {
    let mut registry = MonitorRegistry::new();
    let stats = RunStats {
        pages_processed: 2,
        ..RunStats::default()
    };
    registry.observe(
        7,
        URL,
        &ScraperEvent::StatsUpdate {
            stats,
            is_running: true,
        },
    );

    let snapshot = registry.tab(7).expect("tab recorded");
    assert_eq!(snapshot.url, URL);
    assert_eq!(snapshot.stats, stats);
    assert!(snapshot.is_running);
    assert!(registry.tab(8).is_none());
}

#[test]
fn logs_are_filtered_by_tab_and_capped() {
    let mut registry = MonitorRegistry::new();
    for i in 0..(LOG_CAPACITY + 20) {
        let tab = if i % 2 == 0 { 1 } else { 2 };
        registry.observe(
            tab,
            URL,
            &ScraperEvent::Log(LogRecord::now(Level::Info, format!("line {i}"))),
        );
    }

    let tab_one = registry.logs_for(1);
    let tab_two = registry.logs_for(2);
    assert_eq!(tab_one.len() + tab_two.len(), LOG_CAPACITY);
    assert_eq!(tab_one.last().unwrap().message, format!("line {}", LOG_CAPACITY + 18));
}

#[test]
fn closing_a_tab_evicts_stats_and_logs() {
    let mut registry = MonitorRegistry::new();
    registry.record_stats(1, URL, RunStats::default(), false);
    registry.record_stats(2, URL, RunStats::default(), false);
    registry.record_log(1, LogRecord::now(Level::Warn, "gone"));
    registry.record_log(2, LogRecord::now(Level::Warn, "kept"));

    registry.close_tab(1);

    assert!(registry.tab(1).is_none());
    assert!(registry.logs_for(1).is_empty());
    assert_eq!(registry.tabs().count(), 1);
    assert_eq!(registry.logs_for(2).len(), 1);
}

#[test]
fn reload_keeps_logs() {
    let mut registry = MonitorRegistry::new();
    registry.record_stats(1, URL, RunStats::default(), true);
    registry.record_log(1, LogRecord::now(Level::Info, "before reload"));

    registry.tab_reloaded(1);

    assert!(registry.tab(1).is_none());
    assert_eq!(registry.logs_for(1).len(), 1);
}
