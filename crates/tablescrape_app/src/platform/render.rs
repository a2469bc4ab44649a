use std::fmt::Write;

use engine_logging::LogRecord;
use tablescrape_core::relay::TabSnapshot;
use tablescrape_core::PanelView;

/// Text rendition of the control panel.
pub(crate) fn render_panel(view: &PanelView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[Table Scraper] {}", view.status_text);
    if let Some(progress) = &view.progress_text {
        let _ = writeln!(out, "  {progress}");
    }
    let stats = view.stats;
    let _ = writeln!(
        out,
        "  pages {} | rows {} | duplicates {} | errors {}",
        stats.pages_processed, stats.rows_scraped, stats.duplicates_found, stats.errors
    );
    let _ = write!(
        out,
        "  format {} | {} {} {}",
        view.format,
        button("start", view.start_enabled),
        button("stop", view.stop_enabled),
        button("export", view.export_enabled)
    );
    out
}

pub(crate) fn render_status(snapshot: Option<&TabSnapshot>, logs: &[&LogRecord]) -> String {
    let mut out = String::new();
    match snapshot {
        Some(tab) => {
            let state = if tab.is_running { "running" } else { "idle" };
            let _ = writeln!(out, "{} ({state})", tab.url);
            let _ = writeln!(
                out,
                "  pages {} | rows {} | duplicates {} | errors {}",
                tab.stats.pages_processed,
                tab.stats.rows_scraped,
                tab.stats.duplicates_found,
                tab.stats.errors
            );
        }
        None => {
            let _ = writeln!(out, "no run reported yet");
        }
    }
    for record in logs {
        let _ = writeln!(out, "{}", render_log(record));
    }
    out.trim_end().to_string()
}

pub(crate) fn render_log(record: &LogRecord) -> String {
    format!(
        "  {} {:<5} {}",
        record.timestamp.format("%H:%M:%S"),
        record.level,
        record.message
    )
}

fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}
